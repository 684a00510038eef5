//! Authentication integration tests.
//!
//! Tests verify:
//! - Missing and wrong API keys are rejected with 401
//! - Nothing is written for unauthenticated requests
//! - The order of checks: method before key, key before form and extension

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use super::test_utils::{body_text, upload_request_with, Part, TestServer, TEST_API_KEY};

// =============================================================================
// Rejected Keys
// =============================================================================

#[tokio::test]
async fn test_missing_api_key_rejected() {
    let server = TestServer::new();

    let request = upload_request_with("POST", None, &[Part::file("photo.png", b"data")]);
    let response = server.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "Authorised access only");
    assert!(server.stored_files().is_empty());
}

#[tokio::test]
async fn test_wrong_api_key_rejected() {
    let server = TestServer::new();

    let request = upload_request_with("POST", Some("wrong"), &[Part::file("photo.png", b"data")]);
    let response = server.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(server.stored_files().is_empty());
}

#[tokio::test]
async fn test_api_key_value_is_case_sensitive() {
    let server = TestServer::new();

    let request = upload_request_with(
        "POST",
        Some(&TEST_API_KEY.to_uppercase()),
        &[Part::file("photo.png", b"data")],
    );
    let response = server.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_api_key_with_extra_characters_rejected() {
    let server = TestServer::new();

    for key in [
        format!("{} ", TEST_API_KEY),
        format!("{}x", TEST_API_KEY),
        TEST_API_KEY[..TEST_API_KEY.len() - 1].to_string(),
    ] {
        let request = upload_request_with("POST", Some(&key), &[Part::file("photo.png", b"data")]);
        let response = server.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "key {:?}", key);
    }

    assert!(server.stored_files().is_empty());
}

#[tokio::test]
async fn test_authorization_header_is_not_accepted() {
    let server = TestServer::new();

    let mut request = upload_request_with("POST", None, &[Part::file("photo.png", b"data")]);
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", TEST_API_KEY).parse().unwrap(),
    );
    let response = server.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_header_name_is_case_insensitive() {
    let server = TestServer::new();

    let mut request = upload_request_with("POST", None, &[Part::file("photo.png", b"data")]);
    request
        .headers_mut()
        .insert("x-api-key", TEST_API_KEY.parse().unwrap());
    let response = server.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Check Ordering
// =============================================================================

#[tokio::test]
async fn test_method_checked_before_api_key() {
    let server = TestServer::new();

    let request = Request::builder()
        .method("GET")
        .uri("/upload")
        .body(Body::empty())
        .unwrap();
    let response = server.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_api_key_checked_before_form() {
    let server = TestServer::new();

    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header("X-API-Key", "wrong")
        .body(Body::from("not a form"))
        .unwrap();
    let response = server.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_api_key_checked_before_extension() {
    let server = TestServer::new();

    let request = upload_request_with("POST", Some("wrong"), &[Part::file("archive", b"data")]);
    let response = server.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_different_servers_different_keys() {
    let server = TestServer::with_config(|config| {
        let mut config = config;
        config.api_key = "another-key".to_string();
        config
    });

    let request = upload_request_with("POST", Some(TEST_API_KEY), &[Part::file("a.png", b"x")]);
    let response = server.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = upload_request_with("POST", Some("another-key"), &[Part::file("a.png", b"x")]);
    let response = server.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
