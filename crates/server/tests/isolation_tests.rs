//! Tenant isolation and token validation tests.

mod common;

use axum::http::StatusCode;
use common::{create_record, json_request, register_user, TestServer};
use serde_json::json;
use strongbox_core::config::AuthConfig;
use strongbox_core::token::TokenService;
use time::Duration;

/// Token service sharing the test server's signing secret, for minting
/// tokens the server itself would never issue.
fn test_token_service() -> TokenService {
    let config = AuthConfig::for_testing();
    TokenService::new(&config.jwt_secret, config.token_ttl())
}

#[tokio::test]
async fn tenants_cannot_see_each_other() {
    let server = TestServer::new().await;
    let alice = register_user(&server.router, "alice@example.com", "password123").await;
    let bob = register_user(&server.router, "bob@example.com", "password456").await;

    create_record(&server.router, &alice, "alice-file-1", "alice-secret").await;
    create_record(&server.router, &bob, "bob-file-001", "bob-secret").await;

    // Listings are scoped to the caller
    let (_, body) = json_request(&server.router, "GET", "/metadata", None, Some(&alice)).await;
    assert_eq!(body["total"].as_u64(), Some(1));
    assert_eq!(
        body["items"][0]["file_id"].as_str(),
        Some("alice-file-1")
    );

    // Bob cannot read Alice's record by file_id
    let (status, _) = json_request(
        &server.router,
        "GET",
        "/metadata/alice-file-1",
        None,
        Some(&bob),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Bob cannot delete Alice's record either
    let (status, _) = json_request(
        &server.router,
        "DELETE",
        "/metadata/alice-file-1",
        None,
        Some(&bob),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // And Alice still has it
    let (status, _) = json_request(
        &server.router,
        "GET",
        "/metadata/alice-file-1",
        None,
        Some(&alice),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn bulk_deletes_only_touch_the_caller() {
    let server = TestServer::new().await;
    let alice = register_user(&server.router, "alice@example.com", "password123").await;
    let bob = register_user(&server.router, "bob@example.com", "password456").await;

    create_record(&server.router, &alice, "shared-name-id", "alice-secret").await;
    create_record(&server.router, &bob, "shared-name-id", "bob-secret").await;

    // Bob deleting by a file_id both tenants use touches only his record
    let (_, body) = json_request(
        &server.router,
        "POST",
        "/metadata/delete-selected",
        Some(json!({ "file_ids": ["shared-name-id"] })),
        Some(&bob),
    )
    .await;
    assert_eq!(body["deleted"].as_u64(), Some(1));

    let (_, body) = json_request(&server.router, "GET", "/metadata", None, Some(&alice)).await;
    assert_eq!(body["total"].as_u64(), Some(1));

    // Same for the full sweep
    let (_, body) = json_request(
        &server.router,
        "DELETE",
        "/metadata/all",
        None,
        Some(&alice),
    )
    .await;
    assert_eq!(body["deleted"].as_u64(), Some(1));
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let server = TestServer::new().await;

    let routes = [
        ("GET", "/metadata"),
        ("POST", "/metadata"),
        ("GET", "/metadata/document001"),
        ("DELETE", "/metadata/document001"),
        ("POST", "/metadata/delete-selected"),
        ("DELETE", "/metadata/all"),
    ];

    for (method, uri) in routes {
        let (status, body) = json_request(&server.router, method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["code"].as_str(), Some("unauthorized"), "{method} {uri}");
    }
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let server = TestServer::new().await;

    let (status, body) = json_request(
        &server.router,
        "GET",
        "/metadata",
        None,
        Some("not-a-real-token"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    // Same generic body as every other auth failure
    assert_eq!(
        body["message"].as_str(),
        Some("invalid authentication credentials")
    );
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let server = TestServer::new().await;
    register_user(&server.router, "alice@example.com", "password123").await;

    let expired = test_token_service()
        .issue_with_ttl("alice@example.com", Duration::minutes(-5))
        .unwrap();

    let (status, _) = json_request(&server.router, "GET", "/metadata", None, Some(&expired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_for_unknown_account_is_rejected() {
    let server = TestServer::new().await;

    // Correctly signed, but the subject was never registered
    let ghost = test_token_service().issue("ghost@example.com").unwrap();

    let (status, body) = json_request(&server.router, "GET", "/metadata", None, Some(&ghost)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"].as_str(),
        Some("invalid authentication credentials")
    );
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let server = TestServer::new().await;
    register_user(&server.router, "alice@example.com", "password123").await;

    let forged = TokenService::new("some-other-secret", Duration::minutes(60))
        .issue("alice@example.com")
        .unwrap();

    let (status, _) = json_request(&server.router, "GET", "/metadata", None, Some(&forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
