//! Common test utilities for pickem-axum integration tests

pub mod mock_verifier;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Response};
use pickem_auth_core::{CodecConfig, KeyMaterial, SealedCodec};
use pickem_axum::{CookieConfig, SessionGateway};
use pickem_types::User;

#[allow(unused_imports)]
pub use mock_verifier::MockVerifier;

pub const ALICE_SECRET: &str = "correct horse battery staple";

pub fn alice() -> User {
    User::new(1, "Alice", "Tester", "alice@example.com")
}

pub fn test_codec() -> SealedCodec<User> {
    let keys = KeyMaterial::new([0x5a; 32], [0xa5; 32]).expect("valid test keys");
    SealedCodec::new(CodecConfig::new(keys))
}

pub fn test_gateway(verifier: MockVerifier) -> Arc<SessionGateway> {
    Arc::new(
        SessionGateway::new(test_codec(), Arc::new(verifier), CookieConfig::new())
            .expect("default cookie config is valid"),
    )
}

/// Header map carrying `Cookie: <cookie>`
#[allow(dead_code)]
pub fn cookie_headers(cookie: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
    headers
}

/// Header map carrying `Authorization: Basic ...`
#[allow(dead_code)]
pub fn basic_headers(login: &str, secret: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let value = pickem_axum::BasicCredentials::new(login, secret).to_header_value();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
    headers
}

/// Turn a `Set-Cookie` value into the `name=value` pair a client sends back
pub fn cookie_pair(set_cookie: &HeaderValue) -> String {
    set_cookie
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

/// All `Set-Cookie` values on a response
#[allow(dead_code)]
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}
