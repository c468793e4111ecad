//! HTTP-level tests for the service routes.
//!
//! Drives the router directly with `oneshot`; requests staying in the
//! accepted band never reach the Ollama arbiter, so no runtime is
//! needed.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use server_core::{build_app, Config};
use tower::ServiceExt;

fn test_config() -> Config {
    Config::default()
}

async fn post_analyze(config: Config, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    post_json(config, "/analyze", body).await
}

async fn post_json(
    config: Config,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let app = build_app(&config).unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_app(&test_config()).unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_analyze_redacts_structured_pii() {
    let (status, json) = post_analyze(
        test_config(),
        serde_json::json!({ "text": "My email is john.doe@example.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["has_pii"], true);
    assert_eq!(json["redacted_text"], "My email is [REDACTED_EMAIL_ADDRESS]");
    assert_eq!(json["entities"][0]["type"], "EMAIL_ADDRESS");
    assert_eq!(json["entities"][0]["text"], "john.doe@example.com");
}

#[tokio::test]
async fn test_analyze_clean_text_reports_no_pii() {
    let (status, json) = post_analyze(
        test_config(),
        serde_json::json!({ "text": "Nothing sensitive in here at all" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["has_pii"], false);
    assert_eq!(json["entities"].as_array().unwrap().len(), 0);
    assert_eq!(json["redacted_text"], "Nothing sensitive in here at all");
}

#[tokio::test]
async fn test_analyze_view_renders_display_findings() {
    let (status, json) = post_json(
        test_config(),
        "/analyze/view",
        serde_json::json!({ "text": "My email is john.doe@example.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stats"]["total"], 1);
    assert_eq!(json["stats"]["by_type"]["EMAIL_ADDRESS"], 1);
    let finding = &json["findings"][0];
    assert_eq!(finding["label"], "Email");
    assert_eq!(finding["type"], "EMAIL_ADDRESS");
    assert_eq!(finding["origin"], "Pattern");
    assert!(finding["text_excerpt"]
        .as_str()
        .unwrap()
        .contains("[EMAIL_ADDRESS]"));
    assert_eq!(
        json["masked_preview"],
        "My email is [REDACTED_EMAIL_ADDRESS]"
    );
}

#[tokio::test]
async fn test_analyze_rejects_empty_text() {
    let (status, json) = post_analyze(test_config(), serde_json::json!({ "text": "" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn test_analyze_rejects_oversized_text() {
    let mut config = test_config();
    config.max_text_length = 16;
    let (status, _) = post_analyze(
        config,
        serde_json::json!({ "text": "this body is much longer than sixteen bytes" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
