//! Integration tests for the portal HTTP client

use carelink_client::{ClientError, PortalClient};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_client_builder() {
    let client = PortalClient::builder()
        .base_url("http://localhost:8000")
        .bearer_token("test-token")
        .build();

    assert!(client.is_ok());
    let client = client.unwrap();
    assert_eq!(client.base_url(), "http://localhost:8000");
    assert_eq!(client.bearer_token(), Some("test-token".to_string()));
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = PortalClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_builder_trims_trailing_slash() {
    let client = PortalClient::new("http://localhost:8000/").unwrap();
    assert_eq!(client.base_url(), "http://localhost:8000");
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "email": "pat@example.com",
            "first_name": "Pat",
            "last_name": "Doe",
            "role": "patient"
        })))
        .mount(&mock_server)
        .await;

    let client = PortalClient::builder()
        .base_url(mock_server.uri())
        .bearer_token("token-123")
        .build()
        .unwrap();

    let request = client.request(reqwest::Method::GET, "/auth/me");
    let response: serde_json::Value = client.execute(request).await.unwrap();
    assert_eq!(response["email"], "pat@example.com");
}

#[tokio::test]
async fn test_token_swap_applies_to_next_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer new-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let client = PortalClient::builder()
        .base_url(mock_server.uri())
        .bearer_token("old-token")
        .build()
        .unwrap();

    client.set_bearer_token(Some("new-token"));
    let request = client.request(reqwest::Method::GET, "/auth/me");
    let response: Result<serde_json::Value, _> = client.execute(request).await;
    assert!(response.is_ok());
}

#[tokio::test]
async fn test_cleared_token_sends_no_credential() {
    let mock_server = MockServer::start().await;

    // The mock matches any GET /auth/me; the assertion is on the received
    // request's headers.
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let client = PortalClient::builder()
        .base_url(mock_server.uri())
        .bearer_token("stale")
        .build()
        .unwrap();
    client.set_bearer_token(None);

    let request = client.request(reqwest::Method::GET, "/auth/me");
    let result: Result<serde_json::Value, _> = client.execute(request).await;
    assert!(matches!(result, Err(ClientError::AuthenticationFailed(_))));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_error_status_mapping() {
    let mock_server = MockServer::start().await;

    for (status, body) in [(400, "bad"), (401, "no"), (403, "forbidden"), (404, "gone")] {
        Mock::given(method("GET"))
            .and(path(format!("/status/{status}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
    }

    let client = PortalClient::new(mock_server.uri()).unwrap();

    let get = |p: String| client.execute::<serde_json::Value>(client.request(reqwest::Method::GET, &p));

    assert!(matches!(get("/status/400".into()).await, Err(ClientError::BadRequest(_))));
    assert!(matches!(get("/status/401".into()).await, Err(ClientError::AuthenticationFailed(_))));
    assert!(matches!(get("/status/403".into()).await, Err(ClientError::Forbidden(_))));
    assert!(matches!(get("/status/404".into()).await, Err(ClientError::NotFound(_))));
}

#[tokio::test]
async fn test_server_error_carries_status_and_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/my-appointments"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
        .mount(&mock_server)
        .await;

    let client = PortalClient::new(mock_server.uri()).unwrap();
    let result = client.my_appointments().await;

    match result {
        Err(ClientError::ServerError { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "down for maintenance");
        }
        other => panic!("expected ServerError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_typed_appointments_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/my-appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 11,
            "patient_id": 1,
            "doctor_id": 2,
            "start_time": "2026-03-01T10:00:00Z",
            "end_time": "2026-03-01T10:30:00Z",
            "status": "scheduled",
            "notes": null,
            "created_at": "2026-02-20T09:00:00Z",
            "updated_at": "2026-02-20T09:00:00Z"
        }])))
        .mount(&mock_server)
        .await;

    let client = PortalClient::new(mock_server.uri()).unwrap();
    let appointments = client.my_appointments().await.unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].id, 11);
    assert_eq!(appointments[0].status, "scheduled");
}
