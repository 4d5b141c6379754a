//! Route-level tests over the in-memory backends

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use infagent_api::clients::explorer::InMemoryExplorerClient;
use infagent_api::clients::flagged::InMemoryFlagCheckClient;
use infagent_api::clients::insight::InMemoryInsightClient;
use infagent_api::models::insights::InMemoryInsightRepository;
use infagent_api::models::preferences::InMemoryPreferenceRepository;
use infagent_api::routes;
use infagent_api::state::AppState;
use infagent_wallet::provider::ProviderDirectory;

fn test_app() -> axum::Router {
    let state = Arc::new(AppState::with_parts(
        Arc::new(ProviderDirectory::new()),
        Arc::new(InMemoryFlagCheckClient::new()),
        Arc::new(InMemoryExplorerClient::new()),
        Arc::new(InMemoryInsightClient::with_response("steady as she goes")),
        Arc::new(InMemoryPreferenceRepository::new()),
        Arc::new(InMemoryInsightRepository::new()),
    ));
    routes::router(state)
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_risk_check_rejects_invalid_address() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/risk/check",
            r#"{"address": "not-an-address"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_risk_check_clean_address() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/risk/check",
            r#"{"address": "0xABCDEF0000000000000000000000000000000001"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload["source"]["status"], "Pass");
    assert!(payload["source"]["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_preference_save_without_user_is_noop() {
    let response = test_app()
        .oneshot(json_request(
            "PUT",
            "/preferences",
            r#"{"preferences": {"general_updates": true, "security_alerts": false, "wallet_sync": false}, "wallet_address": null}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload["saved"], false);
}

#[tokio::test]
async fn test_preference_round_trip() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/preferences",
            r#"{"user_id": "user-1", "preferences": {"general_updates": true, "security_alerts": true, "wallet_sync": false}, "wallet_address": "0xABCDEF0000000000000000000000000000000001"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/preferences/user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload["preferences"]["general_updates"], true);
    assert_eq!(
        payload["wallet_address"],
        "0xabcdef0000000000000000000000000000000001"
    );
}

#[tokio::test]
async fn test_connect_without_configured_provider_is_unavailable() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/wallet/connect",
            r#"{"provider": "MetaMask"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_manual_account_flow() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/wallet/accounts",
            r#"{"address": "0xABCDEF0000000000000000000000000000000001"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let session_id = payload["session_id"].as_str().unwrap().to_string();
    assert_eq!(
        payload["main"],
        "0xabcdef0000000000000000000000000000000001"
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/wallet/accounts/{}", session_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/wallet/accounts/00000000-0000-0000-0000-000000000000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_insight_generation_is_accepted() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/insights/0xABCDEF0000000000000000000000000000000001",
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_insights_for_unseen_address_are_empty() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/insights/0xABCDEF0000000000000000000000000000000001")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(payload.as_array().unwrap().is_empty());
}
