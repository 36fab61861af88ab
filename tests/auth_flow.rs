//! Integration tests for the auth endpoint using wiremock.
//!
//! These tests mock `POST /rest/api/auth/userpass` to verify the request
//! shape (form body, headers) and the status-code policy: 200 decodes the
//! token, 500 keeps the body, anything else reports the status.

use nw_incidents::auth::*;
use nw_incidents::client::NwClient;
use nw_incidents::error::NwError;
use reqwest::StatusCode;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper: creates an NwClient pointed at the given wiremock server.
fn mock_client(server: &MockServer) -> NwClient {
    NwClient::with_http_client(reqwest::Client::new(), &server.uri(), "analyst", "s3cret")
}

#[tokio::test]
async fn authenticate_returns_access_token_verbatim() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("POST"))
        .and(path("/rest/api/auth/userpass"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"accessToken":"abc123"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let token = authenticate(&client).await.unwrap();
    assert_eq!(token, "abc123");
}

#[tokio::test]
async fn authenticate_sends_form_encoded_credentials() {
    let server = MockServer::start().await;
    let client = NwClient::with_http_client(
        reqwest::Client::new(),
        &server.uri(),
        "soc admin",
        "p@ss&word",
    );

    // Only a request with the exact form body and headers gets a 200.
    Mock::given(method("POST"))
        .and(path("/rest/api/auth/userpass"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header("accept", "application/json"))
        .and(body_string("username=soc+admin&password=p%40ss%26word"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "soc admin",
            "roles": ["Analysts"],
            "accessToken": "tok-form",
            "refreshToken": "ref-form"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = authenticate(&client).await.unwrap();
    assert_eq!(token, "tok-form");
}

#[tokio::test]
async fn request_token_exposes_full_response() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("POST"))
        .and(path("/rest/api/auth/userpass"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "analyst",
            "roles": ["Analysts", "Responders"],
            "accessToken": "access-1",
            "refreshToken": "refresh-1"
        })))
        .mount(&server)
        .await;

    let resp = request_token(&client).await.unwrap();
    assert_eq!(resp.id.as_deref(), Some("analyst"));
    assert_eq!(resp.roles, vec!["Analysts", "Responders"]);
    assert_eq!(resp.access_token, "access-1");
    assert_eq!(resp.refresh_token.as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn authenticate_500_returns_raw_body() {
    let server = MockServer::start().await;
    let client = mock_client(&server);
    let body = r#"{"status":500,"timestamp":"2024-03-01T10:15:30.123Z","errors":[{"message":"Bad credentials"}]}"#;

    Mock::given(method("POST"))
        .and(path("/rest/api/auth/userpass"))
        .respond_with(ResponseTemplate::new(500).set_body_string(body))
        .mount(&server)
        .await;

    let err = authenticate(&client).await.unwrap_err();
    match &err {
        NwError::AuthRejected { body: got } => assert_eq!(got, body),
        other => panic!("expected AuthRejected, got {other:?}"),
    }
    assert!(
        err.to_string().contains("Bad credentials"),
        "error should include the response body, got: {err}"
    );
}

#[tokio::test]
async fn authenticate_500_with_plain_text_body() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("POST"))
        .and(path("/rest/api/auth/userpass"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = authenticate(&client).await.unwrap_err();
    assert!(
        err.to_string().contains("upstream exploded"),
        "got: {err}"
    );
}

#[tokio::test]
async fn authenticate_403_reports_status_code() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("POST"))
        .and(path("/rest/api/auth/userpass"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let err = authenticate(&client).await.unwrap_err();
    match &err {
        NwError::Status { status } => assert_eq!(*status, StatusCode::FORBIDDEN),
        other => panic!("expected Status, got {other:?}"),
    }
    assert!(err.to_string().contains("403"), "got: {err}");
}

#[tokio::test]
async fn authenticate_other_2xx_is_not_success() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    // Only 200 counts as success on the auth endpoint.
    Mock::given(method("POST"))
        .and(path("/rest/api/auth/userpass"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let err = authenticate(&client).await.unwrap_err();
    assert!(
        matches!(err, NwError::Status { status } if status == StatusCode::NO_CONTENT),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn authenticate_malformed_json_is_parse_error() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("POST"))
        .and(path("/rest/api/auth/userpass"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"accessToken": "#))
        .mount(&server)
        .await;

    let err = authenticate(&client).await.unwrap_err();
    assert!(matches!(err, NwError::Parse(_)), "got: {err:?}");
}

#[tokio::test]
async fn authenticate_empty_token_is_returned_as_is() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("POST"))
        .and(path("/rest/api/auth/userpass"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let token = authenticate(&client).await.unwrap();
    assert_eq!(token, "");
}

#[tokio::test]
async fn authenticate_with_trailing_slash_base_url() {
    let server = MockServer::start().await;
    let client = NwClient::with_http_client(
        reqwest::Client::new(),
        &format!("{}/", server.uri()),
        "analyst",
        "s3cret",
    );

    Mock::given(method("POST"))
        .and(path("/rest/api/auth/userpass"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"accessToken":"slash"}"#))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(authenticate(&client).await.unwrap(), "slash");
}

#[tokio::test]
async fn authenticate_invalid_base_url_fails_before_any_request() {
    let client = NwClient::with_http_client(reqwest::Client::new(), "::not-a-url::", "a", "b");

    let err = authenticate(&client).await.unwrap_err();
    assert!(matches!(err, NwError::InvalidUrl { .. }), "got: {err:?}");
}

#[tokio::test]
async fn authenticate_unreachable_host_is_network_error() {
    // Nothing listens on port 1 of the loopback interface.
    let client = NwClient::with_http_client(reqwest::Client::new(), "http://127.0.0.1:1", "a", "b");

    let err = authenticate(&client).await.unwrap_err();
    assert!(matches!(err, NwError::Network(_)), "got: {err:?}");
}
