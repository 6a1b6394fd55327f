//! Integration tests for the REST client request pipeline.
//!
//! These tests run the client with the bundled HTTP transport against a
//! local mock server and verify URL resolution, parameter handling, body
//! serialization, response interpretation and error construction.

use rest_api::{
    BaseUrl, ClientConfig, ErrorCategory, Payload, QueryParams, RequestInit, RestClient, RestError,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a client whose base URL points at the mock server plus `prefix`.
fn client_for(server: &MockServer, prefix: &str) -> RestClient {
    let config = ClientConfig::builder()
        .base_url(BaseUrl::new(format!("{}{prefix}", server.uri())).unwrap())
        .build()
        .unwrap();
    RestClient::new(&config)
}

// ============================================================================
// URL Resolution
// ============================================================================

#[tokio::test]
async fn test_get_with_params_resolves_against_base_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .and(query_param("active", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "/v1");
    let payload = client
        .get("/users", [("active", "true")], None)
        .await
        .unwrap();

    assert_eq!(payload, Payload::Json(json!([{"id": 1}])));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/v1/users");
    assert_eq!(requests[0].url.query(), Some("active=true"));
}

#[tokio::test]
async fn test_leading_slash_and_trailing_base_slash_are_equivalent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(4)
        .mount(&server)
        .await;

    for prefix in ["/v1", "/v1/"] {
        let client = client_for(&server, prefix);
        client.get("/users", (), None).await.unwrap();
        client.get("users", (), None).await.unwrap();
    }
}

#[tokio::test]
async fn test_absolute_path_without_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestClient::new(&ClientConfig::default());
    let payload = client
        .get(&format!("{}/status", server.uri()), (), None)
        .await
        .unwrap();

    assert_eq!(payload.as_json().unwrap()["ok"], true);
}

#[tokio::test]
async fn test_relative_path_without_base_url_fails() {
    let client = RestClient::new(&ClientConfig::default());

    let result = client.get("/users", (), None).await;

    assert!(matches!(result, Err(RestError::InvalidUrl { url, .. }) if url == "/users"));
}

#[tokio::test]
async fn test_params_are_appended_to_existing_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    client
        .get("users?sort=name", [("sort", "age"), ("limit", "5")], None)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("sort=name&sort=age&limit=5"));
}

#[tokio::test]
async fn test_params_from_query_string_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/sessions/abc"))
        .and(query_param("reason", "logout now"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    let payload = client
        .delete("sessions/abc", QueryParams::parse("reason=logout+now"), None)
        .await
        .unwrap();

    assert!(payload.is_empty());
}

// ============================================================================
// Request Bodies
// ============================================================================

#[tokio::test]
async fn test_post_serializes_structured_body_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"id":1}"#))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1, "status": "new"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    let payload = client.post("orders", json!({"id": 1}), None).await.unwrap();

    assert_eq!(payload.as_json().unwrap()["status"], "new");
}

#[tokio::test]
async fn test_explicit_content_type_is_not_overridden() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/orders/1"))
        .and(header("content-type", "application/merge-patch+json"))
        .and(body_string(r#"{"status":"paid"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "paid"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    let init = RequestInit::new()
        .try_header("Content-Type", "application/merge-patch+json")
        .unwrap();
    client
        .patch("orders/1", json!({"status": "paid"}), Some(init))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_text_body_is_sent_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/notes/1"))
        .and(body_string("plain words"))
        .respond_with(ResponseTemplate::new(200).set_body_string("saved"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    let payload = client.put("notes/1", "plain words", None).await.unwrap();

    assert_eq!(payload, Payload::Text("saved".to_string()));
}

#[tokio::test]
async fn test_typed_round_trip() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Order {
        id: u32,
        items: Vec<String>,
    }

    let order = Order {
        id: 7,
        items: vec!["book".to_string(), "pen".to_string()],
    };
    let serialized = serde_json::to_string(&order).unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_string(serialized.clone()))
        .respond_with(ResponseTemplate::new(201).set_body_raw(serialized, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    let body = rest_api::Body::json(&order).unwrap();
    let created: Order = client
        .post("orders", body, None)
        .await
        .unwrap()
        .deserialize()
        .unwrap();

    assert_eq!(created, order);
}

// ============================================================================
// Response Interpretation
// ============================================================================

#[tokio::test]
async fn test_204_returns_empty_text() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/orders/1"))
        .respond_with(ResponseTemplate::new(204).insert_header("content-type", "application/json"))
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    let payload = client.delete("orders/1", (), None).await.unwrap();

    assert_eq!(payload, Payload::empty());
}

#[tokio::test]
async fn test_empty_json_body_with_zero_length_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/json"))
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    let payload = client.get("empty", (), None).await.unwrap();

    assert_eq!(payload, Payload::empty());
}

#[tokio::test]
async fn test_hal_json_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/links"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"_links":{"self":{"href":"/links"}}}"#, "application/hal+json"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    let payload = client.get("links", (), None).await.unwrap();

    assert_eq!(payload.as_json().unwrap()["_links"]["self"]["href"], "/links");
}

#[tokio::test]
async fn test_malformed_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{oops", "application/json"))
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    let result = client.get("broken", (), None).await;

    assert!(matches!(result, Err(RestError::MalformedBody { .. })));
}

// ============================================================================
// Error Construction
// ============================================================================

#[tokio::test]
async fn test_server_error_carries_response_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"reason": "oops"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    let error = client
        .post("orders", json!({"id": 1}), None)
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "500: Internal Server Error");

    let client_error = error.client_error().unwrap();
    assert_eq!(client_error.message, "500: Internal Server Error");
    assert_eq!(client_error.extensions.response.status, 500);
    assert_eq!(client_error.extensions.response.status_text, "Internal Server Error");
    assert_eq!(
        client_error.extensions.response.url,
        format!("{}/orders", server.uri())
    );
    assert_eq!(client_error.body().as_json().unwrap()["reason"], "oops");
}

#[tokio::test]
async fn test_auth_failures_use_common_error_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401).set_body_string("login required"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = client_for(&server, "");

    let unauthorized = client.get("me", (), None).await.unwrap_err();
    let unauthorized = unauthorized.client_error().unwrap();
    assert_eq!(unauthorized.message, "401: Unauthorized");
    assert_eq!(unauthorized.status(), 401);
    assert_eq!(unauthorized.category(), ErrorCategory::Authentication);
    assert_eq!(unauthorized.body(), &Payload::Text("login required".to_string()));

    let forbidden = client.get("admin", (), None).await.unwrap_err();
    let forbidden = forbidden.client_error().unwrap();
    assert_eq!(forbidden.message, "403: Forbidden");
    assert_eq!(forbidden.status(), 403);
    assert_eq!(forbidden.category(), ErrorCategory::Authorization);
    assert!(forbidden.body().is_empty());
}

#[tokio::test]
async fn test_malformed_error_body_surfaces_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gateway"))
        .respond_with(ResponseTemplate::new(502).set_body_raw("<html>", "application/json"))
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    let result = client.get("gateway", (), None).await;

    assert!(matches!(result, Err(RestError::MalformedBody { .. })));
}

#[tokio::test]
async fn test_no_retry_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    let error = client.get("flaky", (), None).await.unwrap_err();

    assert_eq!(error.status(), Some(503));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_calls_do_not_interact() {
    let server = MockServer::start().await;
    for id in 0..5 {
        Mock::given(method("GET"))
            .and(path(format!("/items/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": id})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = std::sync::Arc::new(client_for(&server, ""));
    let handles: Vec<_> = (0..5)
        .map(|id| {
            let client = client.clone();
            tokio::spawn(async move { client.get(&format!("items/{id}"), (), None).await })
        })
        .collect();

    for (id, handle) in handles.into_iter().enumerate() {
        let payload = handle.await.unwrap().unwrap();
        assert_eq!(payload.as_json().unwrap()["id"], id);
    }
}
