//! Shared fixtures for the session contract tests
//!
//! Every test runs its own `MockServer`; expectations set with `.expect(n)`
//! are verified when the server is dropped.

#![allow(dead_code)]

use eft_client::{AUTH_PATH, Session};
use eft_core::ProviderConfig;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "s3cret-pw";

/// Configuration pointing at the mock server
pub fn config_for(server: &MockServer) -> ProviderConfig {
    ProviderConfig::new(server.uri(), USERNAME, PASSWORD)
}

/// Successful login response carrying `token`
pub fn login_ok(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "authToken": token }))
}

/// Mount a login endpoint that always hands out `token`
pub async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(login_ok(token))
        .mount(server)
        .await;
}

/// Mount a login endpoint that hands out `tok-1`, `tok-2`, ... in order
///
/// Returns the shared call counter.
pub async fn mount_rotating_login(server: &MockServer, expected_calls: u64) -> Arc<AtomicUsize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(move |_req: &Request| -> ResponseTemplate {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            login_ok(&format!("tok-{}", n))
        })
        .expect(expected_calls)
        .mount(server)
        .await;

    calls
}

/// Log in against a server that hands out `token`
pub async fn connected(server: &MockServer, token: &str) -> Session {
    mount_login(server, token).await;
    Session::connect(&config_for(server))
        .await
        .expect("session should connect")
}

/// `Authorization` header value for `token`
pub fn bearer(token: &str) -> String {
    format!("EFTAdminAuthToken {}", token)
}

/// A `GET /admin/v2/server` response body
pub fn server_body() -> Value {
    json!({
        "data": {
            "type": "server",
            "id": "srv-1",
            "attributes": {
                "version": "8.1.0.12",
                "general": {
                    "configFilePath": "C:\\ProgramData\\Globalscape\\EFT Server",
                    "enableUtcInListings": false,
                    "lastModifiedBy": "admin",
                    "lastModifiedTime": 1700000000
                },
                "listenerSettings": {
                    "adminPort": 1100,
                    "enableRemoteAdministration": true,
                    "listenIps": ["0.0.0.0"]
                },
                "smtp": {
                    "login": "mailer",
                    "password": "smtp-pw",
                    "port": 587,
                    "senderAddr": "eft@example.com",
                    "senderName": "EFT",
                    "server": "smtp.example.com",
                    "useAuthentication": true,
                    "useImplicitTLS": false
                }
            }
        }
    })
}
