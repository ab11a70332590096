//! Mock vault endpoints built on wiremock

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::constants::*;

/// A record in the shape the vault returns it
pub fn vault_record(id: &str, item_state: &str, version_state: &str, secret: &str) -> Value {
    json!({
        "id": id,
        "item_state": item_state,
        "current_version": { "secret": secret, "state": version_state }
    })
}

pub fn active_record(id: &str, secret: &str) -> Value {
    vault_record(id, "enabled", "active", secret)
}

pub fn list_response(items: Vec<Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "result": { "items": items } }))
}

/// Mount a `/v1/list` endpoint answering with `items`, expecting `calls` requests
pub async fn mock_list(server: &MockServer, items: Vec<Value>, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/list"))
        .and(header("authorization", BEARER_TEST_TOKEN))
        .respond_with(list_response(items))
        .expect(calls)
        .mount(server)
        .await;
}

/// Mount a `/v1/list` endpoint that always fails with `status`
pub async fn mock_list_failure(server: &MockServer, status: u16, body: &str, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/list"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(calls)
        .mount(server)
        .await;
}

/// Mount a `/v1/list` endpoint failing with 503 `fail_count` times before answering
pub async fn mock_flaky_list(server: &MockServer, fail_count: u64, items: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path("/v1/list"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .up_to_n_times(fail_count)
        .expect(fail_count)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/list"))
        .respond_with(list_response(items))
        .expect(1)
        .mount(server)
        .await;
}

/// Mount a `/v1/get` endpoint answering with `record`
pub async fn mock_get(server: &MockServer, record: Value, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/get"))
        .and(header("authorization", BEARER_TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": record })))
        .expect(calls)
        .mount(server)
        .await;
}
