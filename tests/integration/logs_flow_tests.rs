//! Integration tests for the log retrieval path.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use rancher_chatops::slack::events::process_interaction;
use rancher_chatops::slack::handlers::logs::wait_for_artifact;
use rancher_chatops::slack::ERROR_COLOR;
use rancher_chatops::AppError;

use super::test_helpers::{
    encode, harness_with, select_payload, ChatCall, FakeChat, FakeControlPlane, PlaneCall,
    PlaneMode, BOT_CHANNEL, ORIGIN_CHANNEL, ORIGIN_TS, TOKEN,
};

#[tokio::test]
async fn logs_upload_and_rewrite_original() {
    let h = harness_with(FakeChat::default(), FakeControlPlane::new(json!({})));
    let body = encode(&select_payload(TOKEN, "logsContainer", "1i42"));

    let reply = process_interaction(&h.state, body.as_bytes()).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(h.plane.calls(), vec![PlaneCall::Logs("1i42".into())]);

    let calls = h.chat.calls();
    assert_eq!(calls.len(), 1, "only the upload happens before responding");
    let ChatCall::Upload(upload) = &calls[0] else {
        panic!("expected upload, got {calls:?}");
    };
    assert_eq!(upload.channel, BOT_CHANNEL);
    assert_eq!(upload.filetype, "text");
    assert_eq!(upload.title, "Logs do container: 1i42");
    assert!(upload.path.ends_with("1i42.log"));

    let message = reply.message.expect("log path answers with a message");
    assert!(message.attachments.is_empty());
    assert_eq!(message.files.len(), 1);
    assert_eq!(message.files[0].id, "F_LOGS");
    assert_eq!(message.files[0].title, "Logs do container: 1i42");
    assert_eq!(message.files[0].filetype, "text");

    let deferred = reply.after_response.expect("delete scheduled after response");
    deferred.run(&h.state).await;
    assert_eq!(
        h.chat.deletes(),
        vec![(ORIGIN_CHANNEL.to_owned(), ORIGIN_TS.to_owned())]
    );
    assert!(h.chat.posts().is_empty());
}

#[tokio::test]
async fn missing_artifact_is_reported_and_original_deleted() {
    let h = harness_with(
        FakeChat::default(),
        FakeControlPlane::with_mode(json!({}), PlaneMode::MissingArtifact),
    );
    let body = encode(&select_payload(TOKEN, "logsContainer", "1i42"));

    let reply = process_interaction(&h.state, body.as_bytes()).await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(reply.message.is_none());
    assert!(reply.after_response.is_none());

    let posts = h.chat.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].color, ERROR_COLOR);
    assert!(posts[0].text.contains("`logsContainer`"));
    assert_eq!(h.chat.deletes().len(), 1);
    assert!(
        !h.chat.calls().iter().any(|c| matches!(c, ChatCall::Upload(_))),
        "nothing to upload when the artifact never appears"
    );
}

#[tokio::test]
async fn upload_failure_is_reported() {
    let chat = FakeChat {
        fail_uploads: true,
        ..FakeChat::default()
    };
    let h = harness_with(chat, FakeControlPlane::new(json!({})));
    let body = encode(&select_payload(TOKEN, "logsContainer", "1i42"));

    let reply = process_interaction(&h.state, body.as_bytes()).await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    let posts = h.chat.posts();
    assert_eq!(posts.len(), 1);
    assert!(posts[0].text.contains("upload rejected"));
    assert_eq!(h.chat.deletes().len(), 1);
}

#[tokio::test]
async fn wait_for_artifact_returns_once_file_exists() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("late.log");

    let writer_path = path.clone();
    let writer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        tokio::fs::write(writer_path, "late").await.expect("write");
    });

    wait_for_artifact(&path, Duration::from_millis(20), 6)
        .await
        .expect("artifact appears");
    writer.await.expect("writer finished");
}

#[tokio::test]
async fn wait_for_artifact_gives_up_after_attempts() {
    let temp = tempfile::tempdir().expect("tempdir");
    let err = wait_for_artifact(&temp.path().join("never.log"), Duration::from_millis(1), 3)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Io(msg) if msg.contains("3 probes")));
}
