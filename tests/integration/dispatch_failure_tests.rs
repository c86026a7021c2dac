//! Integration tests for rejected callbacks and control-plane failures.

use axum::http::StatusCode;
use serde_json::json;

use rancher_chatops::slack::events::process_interaction;
use rancher_chatops::slack::ERROR_COLOR;

use super::test_helpers::{
    cancel_payload, encode, harness, harness_with, select_payload, FakeChat, FakeControlPlane,
    PlaneCall, PlaneMode, ORIGIN_CHANNEL, ORIGIN_TS, TOKEN,
};

#[tokio::test]
async fn wrong_token_is_401_with_no_adapter_calls() {
    let h = harness();

    for payload in [
        select_payload("forged", "restartContainer", "1i42"),
        select_payload("forged", "logsContainer", "1i42"),
        cancel_payload("forged"),
    ] {
        let reply = process_interaction(&h.state, encode(&payload).as_bytes()).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert!(reply.message.is_none());
        assert!(reply.after_response.is_none());
    }

    assert!(h.plane.calls().is_empty());
    assert!(h.chat.calls().is_empty());
}

#[tokio::test]
async fn undecodable_body_is_500_with_no_adapter_calls() {
    let h = harness();

    for body in [&b"token=T"[..], &b"payload=%7B"[..], &b""[..]] {
        let reply = process_interaction(&h.state, body).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    assert!(h.plane.calls().is_empty());
    assert!(h.chat.calls().is_empty());
}

#[tokio::test]
async fn unknown_action_kind_is_500() {
    let h = harness();
    let mut payload = select_payload(TOKEN, "restartContainer", "1i42");
    payload["actions"][0]["name"] = json!("approve");

    let reply = process_interaction(&h.state, encode(&payload).as_bytes()).await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(h.plane.calls().is_empty());
    assert!(h.chat.calls().is_empty());
}

#[tokio::test]
async fn missing_selection_is_500_before_any_call() {
    let h = harness();
    let mut payload = select_payload(TOKEN, "restartContainer", "1i42");
    payload["actions"][0]["selected_options"] = json!([]);

    let reply = process_interaction(&h.state, encode(&payload).as_bytes()).await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(h.plane.calls().is_empty());
    assert!(h.chat.calls().is_empty());
}

#[tokio::test]
async fn control_plane_failure_is_surfaced_and_original_deleted() {
    let h = harness_with(
        FakeChat::default(),
        FakeControlPlane::with_mode(json!({}), PlaneMode::Fail),
    );

    let body = encode(&select_payload(TOKEN, "getServiceInfo", "svc-1"));
    let reply = process_interaction(&h.state, body.as_bytes()).await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(h.plane.calls(), vec![PlaneCall::ServiceInfo("svc-1".into())]);

    let posts = h.chat.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].color, ERROR_COLOR);
    assert!(posts[0].text.contains("`getServiceInfo`"));
    assert!(posts[0].text.contains("rancher returned 503"));
    assert_eq!(
        h.chat.deletes(),
        vec![(ORIGIN_CHANNEL.to_owned(), ORIGIN_TS.to_owned())]
    );
}

#[tokio::test]
async fn hung_control_plane_call_times_out() {
    let h = harness_with(
        FakeChat::default(),
        FakeControlPlane::with_mode(json!({}), PlaneMode::Hang),
    );

    let body = encode(&select_payload(TOKEN, "restartContainer", "1i42"));
    let reply = process_interaction(&h.state, body.as_bytes()).await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    let posts = h.chat.posts();
    assert_eq!(posts.len(), 1);
    assert!(posts[0].text.contains("timeout: restart_container exceeded 1s"));
    assert_eq!(h.chat.deletes().len(), 1);
}
