//! Unit tests for the user-facing texts produced by each handler.

use rancher_chatops::models::operation::OperationId;
use rancher_chatops::rancher::OperationResult;
use rancher_chatops::slack::handlers::canary::{
    canary_disabled_text, canary_enabled_text, canary_info_text,
};
use rancher_chatops::slack::handlers::cancel::cancel_title;
use rancher_chatops::slack::handlers::failure_text;
use rancher_chatops::slack::handlers::logs::logs_title;
use rancher_chatops::slack::handlers::restart::restart_text;
use rancher_chatops::slack::handlers::service::service_info_text;
use rancher_chatops::AppError;
use serde_json::json;

#[test]
fn service_info_lists_five_fields() {
    let info = OperationResult::new(json!({
        "id": "svc-1",
        "name": "web",
        "launchConfig": { "imageUuid": "img:1" },
        "state": "active",
        "created": "2020-01-01"
    }));

    assert_eq!(
        service_info_text(&info),
        "*ID:* `svc-1`\n*Nome:* `web`\n*Imagem:* `img:1`\n*Status:* `active`\n*Data de Criação:* `2020-01-01`"
    );
}

#[test]
fn service_info_tolerates_missing_fields() {
    let info = OperationResult::new(json!({ "id": "svc-2" }));
    let text = service_info_text(&info);
    assert!(text.starts_with("*ID:* `svc-2`\n*Nome:* ``\n"));
    assert!(text.contains("*Imagem:* ``"));
}

#[test]
fn restart_text_names_container_and_user() {
    assert_eq!(
        restart_text("1i42", "alice"),
        "Container de ID 1i42 restartado por @alice com sucesso! :sunglasses:\n\n"
    );
}

#[test]
fn cancel_title_mentions_user() {
    assert_eq!(cancel_title("bob"), ":x: @bob cancelou a requisição");
}

#[test]
fn canary_texts_embed_payload() {
    let resp = OperationResult::new(json!({ "lbConfig": { "config": "backend canary" } }));

    let enabled = canary_enabled_text("1s7", &resp);
    assert!(enabled.starts_with("*Canary Deployment* do LB `1s7` ativado.\n```"));
    assert!(enabled.contains("backend canary"));
    assert!(enabled.ends_with("```"));

    let disabled = canary_disabled_text("1s7", &resp);
    assert!(disabled.starts_with("*Canary Deployment* do LB `1s7` desativado.\n```"));
}

#[test]
fn canary_info_shows_only_haproxy_config() {
    let resp = OperationResult::new(json!({
        "id": "1s7",
        "lbConfig": { "config": "global\n  maxconn 4096" }
    }));
    assert_eq!(
        canary_info_text("1s7", &resp),
        "Arquivo haproxy.cfg do LoadBalancer `1s7`.\n```global\n  maxconn 4096```"
    );
}

#[test]
fn logs_title_names_container() {
    assert_eq!(logs_title("1i42"), "Logs do container: 1i42");
}

#[test]
fn failure_text_names_operation_value_and_error() {
    let err = AppError::ControlPlane("rancher returned 404 Not Found".into());
    let text = failure_text(OperationId::RestartContainer, "1i42", &err);
    assert!(text.contains("`restartContainer`"));
    assert!(text.contains("`1i42`"));
    assert!(text.contains("control plane: rancher returned 404 Not Found"));
}
