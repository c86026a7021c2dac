//! Integration tests for the HTTP surface.
//!
//! Binds the real axum router on an ephemeral port and drives it with
//! `reqwest`, using fakes behind `AppState`.

use std::time::Duration;

use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use rancher_chatops::server::serve;

use super::test_helpers::{
    cancel_payload, encode, harness, harness_with, select_payload, FakeChat, FakeControlPlane,
    Harness, ORIGIN_CHANNEL, ORIGIN_TS, TOKEN,
};

/// Spawn the server for `h`, returning its base URL.
///
/// Caller must cancel `ct` to shut the server down.
async fn spawn_server(h: &Harness) -> (String, CancellationToken) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral");
    let addr = listener.local_addr().expect("local addr");

    let ct = CancellationToken::new();
    let server_ct = ct.clone();
    let state = h.state.clone();
    tokio::spawn(async move {
        let _ = serve(listener, state, server_ct).await;
    });

    (format!("http://{addr}"), ct)
}

async fn post_form(url: &str, body: String) -> reqwest::Response {
    reqwest::Client::new()
        .post(url)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .expect("HTTP POST")
}

#[tokio::test]
async fn health_returns_ok() {
    let h = harness();
    let (base_url, ct) = spawn_server(&h).await;

    let resp = reqwest::get(format!("{base_url}/health"))
        .await
        .expect("HTTP GET /health");

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.expect("body"), "ok");
    ct.cancel();
}

#[tokio::test]
async fn non_post_is_405() {
    let h = harness();
    let (base_url, ct) = spawn_server(&h).await;

    let resp = reqwest::get(format!("{base_url}/"))
        .await
        .expect("HTTP GET /");
    assert_eq!(resp.status(), 405);

    let resp = reqwest::Client::new()
        .put(format!("{base_url}/"))
        .body(encode(&cancel_payload(TOKEN)))
        .send()
        .await
        .expect("HTTP PUT /");
    assert_eq!(resp.status(), 405);

    assert!(h.chat.calls().is_empty());
    ct.cancel();
}

#[tokio::test]
async fn wrong_token_is_401_with_empty_body() {
    let h = harness();
    let (base_url, ct) = spawn_server(&h).await;

    let resp = post_form(
        &format!("{base_url}/"),
        encode(&select_payload("forged", "restartContainer", "1i42")),
    )
    .await;

    assert_eq!(resp.status(), 401);
    assert!(resp.text().await.expect("body").is_empty());
    assert!(h.plane.calls().is_empty());
    ct.cancel();
}

#[tokio::test]
async fn malformed_body_is_500() {
    let h = harness();
    let (base_url, ct) = spawn_server(&h).await;

    let resp = post_form(&format!("{base_url}/"), "hello".into()).await;

    assert_eq!(resp.status(), 500);
    ct.cancel();
}

#[tokio::test]
async fn select_is_200_with_empty_body() {
    let h = harness_with(
        FakeChat::default(),
        FakeControlPlane::new(json!({ "id": "svc-1", "name": "web" })),
    );
    let (base_url, ct) = spawn_server(&h).await;

    let resp = post_form(
        &format!("{base_url}/"),
        encode(&select_payload(TOKEN, "getServiceInfo", "svc-1")),
    )
    .await;

    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.expect("body").is_empty());
    assert_eq!(h.chat.posts().len(), 1);
    assert_eq!(h.chat.deletes().len(), 1);
    ct.cancel();
}

#[tokio::test]
async fn cancel_returns_json_then_deletes() {
    let h = harness();
    let (base_url, ct) = spawn_server(&h).await;

    let resp = post_form(&format!("{base_url}/"), encode(&cancel_payload(TOKEN))).await;

    assert_eq!(resp.status(), 200);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(content_type.starts_with("application/json"));

    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body["attachments"][0]["actions"], json!([]));
    assert_eq!(
        body["attachments"][0]["fields"][0]["title"],
        ":x: @bob cancelou a requisição"
    );

    // The delete runs after the response on its own task.
    let mut deletes = h.chat.deletes();
    for _ in 0..50 {
        if !deletes.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        deletes = h.chat.deletes();
    }
    assert_eq!(deletes, vec![(ORIGIN_CHANNEL.to_owned(), ORIGIN_TS.to_owned())]);
    ct.cancel();
}
