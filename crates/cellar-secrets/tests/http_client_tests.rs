//! HTTP transport tests against a mock vault

mod common;

use cellar_secrets::{AuthenticatedClient, TransportError};
use common::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_post_sends_bearer_token_and_json_body() {
    let server = MockServer::start().await;
    let body = json!({ "filter": { "id__in": [ID_API_KEY] }, "include_secrets": true });

    Mock::given(method("POST"))
        .and(path("/v1/list"))
        .and(header("authorization", BEARER_TEST_TOKEN))
        .and(header("content-type", "application/json"))
        .and(body_json(body.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server, 1)
        .post("/v1/list", &body)
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert!(response.is_success());
    assert_eq!(response.text(), "{}");
}

#[tokio::test]
async fn test_retries_transient_status() {
    let server = MockServer::start().await;
    mock_flaky_list(&server, 2, vec![active_record(ID_API_KEY, API_KEY)]).await;

    let response = client_for(&server, 3)
        .post("/v1/list", &json!({}))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_returns_last_response_when_retries_exhausted() {
    let server = MockServer::start().await;
    mock_list_failure(&server, 500, "internal error", 3).await;

    let response = client_for(&server, 3)
        .post("/v1/list", &json!({}))
        .await
        .unwrap();

    assert_eq!(response.status, 500);
    assert_eq!(response.text(), "internal error");
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let server = MockServer::start().await;
    mock_list_failure(&server, 401, "unauthorized", 1).await;

    let response = client_for(&server, 5)
        .post("/v1/list", &json!({}))
        .await
        .unwrap();

    assert_eq!(response.status, 401);
}

#[tokio::test]
async fn test_connection_failure_is_request_error() {
    let client = client_for_url(&closed_port_url(), 2);

    let err = client.post("/v1/list", &json!({})).await.unwrap_err();
    match err {
        TransportError::Request { path, attempts, .. } => {
            assert_eq!(path, "/v1/list");
            assert_eq!(attempts, 2);
        }
        other => panic!("expected Request error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_zero_attempts_is_not_attempted() {
    let server = MockServer::start().await;
    let err = client_for(&server, 0)
        .post("/v1/list", &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::NotAttempted { .. }));
}
