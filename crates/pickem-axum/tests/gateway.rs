//! Session gateway integration tests
//!
//! Drives login, logout, state and verify against a counting mock verifier.

mod common;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use common::{alice, basic_headers, cookie_headers, cookie_pair, test_gateway, MockVerifier, ALICE_SECRET};
use pickem_auth_core::CredentialError;
use pickem_axum::{AuthError, AuthSource};

fn verifier() -> MockVerifier {
    MockVerifier::new().with_user(alice(), ALICE_SECRET)
}

#[tokio::test]
async fn test_login_issues_session_cookie() {
    let verifier = verifier();
    let gateway = test_gateway(verifier.clone());

    let cookie = gateway
        .login(&basic_headers("alice@example.com", ALICE_SECRET))
        .await
        .unwrap();

    let rendered = cookie.to_str().unwrap();
    assert!(rendered.starts_with("nflpickem="));
    assert!(rendered.contains("HttpOnly"));
    assert!(rendered.contains("Path=/"));
    assert!(!rendered.contains("alice@example.com"));
    assert_eq!(verifier.calls(), 1);
}

#[tokio::test]
async fn test_login_without_credentials() {
    let verifier = verifier();
    let gateway = test_gateway(verifier.clone());

    let err = gateway.login(&HeaderMap::new()).await.unwrap_err();
    assert!(matches!(err, AuthError::MissingCredentials));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(verifier.calls(), 0);
}

#[tokio::test]
async fn test_login_wrong_secret() {
    let gateway = test_gateway(verifier());

    let err = gateway
        .login(&basic_headers("alice@example.com", "wrong"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AuthError::LoginFailed(CredentialError::InvalidCredentials)
    ));
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_login_unknown_user() {
    let gateway = test_gateway(verifier());

    let err = gateway
        .login(&basic_headers("mallory@example.com", ALICE_SECRET))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    // Same outward failure as a wrong secret
    let wrong = gateway
        .login(&basic_headers("alice@example.com", "wrong"))
        .await
        .unwrap_err();
    assert_eq!(err.public_message(), wrong.public_message());
}

#[tokio::test]
async fn test_login_store_unavailable() {
    let verifier = verifier();
    verifier.set_unavailable(true);
    let gateway = test_gateway(verifier);

    let err = gateway
        .login(&basic_headers("alice@example.com", ALICE_SECRET))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AuthError::LoginFailed(CredentialError::Unavailable(_))
    ));
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_login_ignores_existing_cookie() {
    let verifier = verifier();
    let gateway = test_gateway(verifier.clone());

    let first = gateway
        .login(&basic_headers("alice@example.com", ALICE_SECRET))
        .await
        .unwrap();

    // A valid cookie does not stand in for credentials at login
    let err = gateway
        .login(&cookie_headers(&cookie_pair(&first)))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::MissingCredentials));
    assert_eq!(verifier.calls(), 1);
}

#[tokio::test]
async fn test_state_reports_cookie_owner() {
    let gateway = test_gateway(verifier());

    let cookie = gateway
        .login(&basic_headers("alice@example.com", ALICE_SECRET))
        .await
        .unwrap();
    let state = gateway.state(&cookie_headers(&cookie_pair(&cookie))).unwrap();

    assert_eq!(state.name, "Alice");
    assert_eq!(state.username, "alice@example.com");
}

#[tokio::test]
async fn test_state_never_uses_basic_credentials() {
    let verifier = verifier();
    let gateway = test_gateway(verifier.clone());

    let err = gateway
        .state(&basic_headers("alice@example.com", ALICE_SECRET))
        .unwrap_err();
    assert!(matches!(err, AuthError::LoginRequired));
    assert_eq!(verifier.calls(), 0);
}

#[tokio::test]
async fn test_state_rejects_garbage_cookie() {
    let gateway = test_gateway(verifier());

    let err = gateway.state(&cookie_headers("nflpickem=not-a-token")).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(err.public_message(), "login required");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let gateway = test_gateway(verifier());

    let cookie = gateway
        .login(&basic_headers("alice@example.com", ALICE_SECRET))
        .await
        .unwrap();
    let cleared = gateway
        .logout(&cookie_headers(&cookie_pair(&cookie)))
        .unwrap();

    let rendered = cleared.to_str().unwrap();
    assert!(rendered.starts_with("nflpickem=;"));
    assert!(rendered.contains("Max-Age=-1"));
}

#[tokio::test]
async fn test_logout_without_session() {
    let gateway = test_gateway(verifier());

    assert!(gateway.logout(&HeaderMap::new()).is_ok());
    assert!(gateway.logout(&cookie_headers("nflpickem=garbage")).is_ok());
}

#[tokio::test]
async fn test_verify_cookie_skips_verifier() {
    let verifier = verifier();
    let gateway = test_gateway(verifier.clone());

    let cookie = gateway
        .login(&basic_headers("alice@example.com", ALICE_SECRET))
        .await
        .unwrap();
    assert_eq!(verifier.calls(), 1);

    let verified = gateway
        .verify(&cookie_headers(&cookie_pair(&cookie)))
        .await
        .unwrap();

    assert_eq!(verified.user, alice());
    assert_eq!(verified.source, AuthSource::Cookie);
    assert!(verified.cookie.is_none());
    assert_eq!(verifier.calls(), 1);
}

#[tokio::test]
async fn test_verify_basic_issues_cookie() {
    let verifier = verifier();
    let gateway = test_gateway(verifier.clone());

    let verified = gateway
        .verify(&basic_headers("alice@example.com", ALICE_SECRET))
        .await
        .unwrap();

    assert_eq!(verified.source, AuthSource::BasicAuth);
    let cookie = verified.cookie.expect("fresh cookie");
    assert_eq!(verifier.calls(), 1);

    // The issued cookie resolves on its own afterwards
    let again = gateway
        .verify(&cookie_headers(&cookie_pair(&cookie)))
        .await
        .unwrap();
    assert_eq!(again.user, alice());
    assert_eq!(verifier.calls(), 1);
}

#[tokio::test]
async fn test_verify_falls_back_when_cookie_invalid() {
    let verifier = verifier();
    let gateway = test_gateway(verifier.clone());

    let mut headers = basic_headers("alice@example.com", ALICE_SECRET);
    headers.extend(cookie_headers("nflpickem=tampered"));

    let verified = gateway.verify(&headers).await.unwrap();
    assert_eq!(verified.source, AuthSource::BasicAuth);
    assert_eq!(verifier.calls(), 1);
}

#[tokio::test]
async fn test_verify_nothing_presented() {
    let verifier = verifier();
    let gateway = test_gateway(verifier.clone());

    let err = gateway.verify(&HeaderMap::new()).await.unwrap_err();
    assert!(matches!(err, AuthError::NoLogin));
    assert_eq!(verifier.calls(), 0);
}

#[tokio::test]
async fn test_verify_bad_credentials() {
    let gateway = test_gateway(verifier());

    let err = gateway
        .verify(&basic_headers("alice@example.com", "nope"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cookie_from_other_gateway_rejected() {
    use std::sync::Arc;

    use pickem_auth_core::{CodecConfig, KeyMaterial, SealedCodec};
    use pickem_axum::{CookieConfig, SessionGateway};

    let gateway = test_gateway(verifier());
    let cookie = gateway
        .login(&basic_headers("alice@example.com", ALICE_SECRET))
        .await
        .unwrap();

    let keys = KeyMaterial::new([0x11; 32], [0x22; 32]).unwrap();
    let other = SessionGateway::new(
        SealedCodec::new(CodecConfig::new(keys)),
        Arc::new(verifier()),
        CookieConfig::new(),
    )
    .unwrap();

    assert!(other.state(&cookie_headers(&cookie_pair(&cookie))).is_err());
}
