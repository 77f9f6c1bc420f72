//! Contract Test: Session Authentication
//!
//! Verifies the token lifecycle of `Session` against a mock EFT server.
//!
//! Constraints verified:
//! - Building a session performs exactly one login with the configured
//!   credentials, and fails with `Error::Authentication` if the login fails
//! - Authenticated calls carry `Authorization: EFTAdminAuthToken <token>`
//! - A 401 triggers one re-login and one replay (body included), never more
//! - Concurrent 401s on the same stale token share a single re-login
//! - A session whose re-login failed refuses further calls without touching
//!   the network

mod common;

use common::*;
use eft_client::{AUTH_PATH, Session};
use eft_core::models::UserAttributes;
use eft_core::{AdminApi, Error};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn connect_posts_credentials_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "userName": USERNAME,
            "password": PASSWORD,
            "authType": "EFT"
        })))
        .respond_with(login_ok("tok-1"))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::connect(&config_for(&server)).await.unwrap();
    assert!(session.is_authenticated().await);
}

#[tokio::test]
async fn connect_forwards_configured_auth_type() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .and(body_json(json!({
            "userName": USERNAME,
            "password": PASSWORD,
            "authType": "AD"
        })))
        .respond_with(login_ok("tok-ad"))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server).with_auth_type("AD");
    Session::connect(&config).await.unwrap();
}

#[tokio::test]
async fn rejected_login_fails_construction() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("  invalid credentials \n"))
        .expect(1)
        .mount(&server)
        .await;

    let err = Session::connect(&config_for(&server)).await.unwrap_err();
    match err {
        Error::Authentication(message) => {
            assert!(message.contains("POST"), "{message}");
            assert!(message.contains(AUTH_PATH), "{message}");
            assert!(message.contains("invalid credentials"), "{message}");
            assert!(!message.contains(PASSWORD), "{message}");
        }
        other => panic!("expected authentication error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_fails_construction_as_authentication() {
    // Bind then drop a server so the port refuses connections
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let config = eft_core::ProviderConfig::new(uri, USERNAME, PASSWORD);
    let err = Session::connect(&config).await.unwrap_err();
    assert!(matches!(err, Error::Authentication(_)), "got {err:?}");
}

#[tokio::test]
async fn malformed_login_response_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = Session::connect(&config_for(&server)).await.unwrap_err();
    assert!(matches!(err, Error::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn calls_carry_the_session_token() {
    let server = MockServer::start().await;
    let session = connected(&server, "tok-abc").await;

    Mock::given(method("GET"))
        .and(path("/admin/v2/server"))
        .and(header("authorization", bearer("tok-abc").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(server_body()))
        .expect(1)
        .mount(&server)
        .await;

    let srv = session.get_server().await.unwrap();
    assert_eq!(srv.id, "srv-1");
}

#[tokio::test]
async fn expired_token_is_renewed_and_request_replayed_once() {
    let server = MockServer::start().await;
    mount_rotating_login(&server, 2).await;

    let session = Session::connect(&config_for(&server)).await.unwrap();

    Mock::given(method("GET"))
        .and(path("/admin/v2/server"))
        .and(header("authorization", bearer("tok-1").as_str()))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/v2/server"))
        .and(header("authorization", bearer("tok-2").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(server_body()))
        .expect(1)
        .mount(&server)
        .await;

    let srv = session.get_server().await.unwrap();
    assert_eq!(srv.attributes.version, "8.1.0.12");
    assert!(session.is_authenticated().await);
}

#[tokio::test]
async fn replayed_request_resends_the_body() {
    let server = MockServer::start().await;
    mount_rotating_login(&server, 2).await;

    let session = Session::connect(&config_for(&server)).await.unwrap();

    let expected_body = json!({
        "data": {"type": "user", "attributes": {"loginName": "bob"}}
    });

    Mock::given(method("POST"))
        .and(path("/admin/v2/sites/s1/users"))
        .and(header("authorization", bearer("tok-1").as_str()))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/admin/v2/sites/s1/users"))
        .and(header("authorization", bearer("tok-2").as_str()))
        .and(body_json(expected_body))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"type": "user", "id": "u1", "attributes": {"loginName": "bob"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let attrs = UserAttributes {
        login_name: "bob".into(),
        ..Default::default()
    };
    let user = session.create_site_user("s1", &attrs).await.unwrap();
    assert_eq!(user.id, "u1");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_unauthorized_calls_share_one_renewal() {
    let server = MockServer::start().await;
    let logins = mount_rotating_login(&server, 2).await;

    let session = Arc::new(Session::connect(&config_for(&server)).await.unwrap());

    Mock::given(method("GET"))
        .and(path("/admin/v2/server"))
        .and(header("authorization", bearer("tok-1").as_str()))
        .respond_with(ResponseTemplate::new(401))
        .expect(1..=8)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/v2/server"))
        .and(header("authorization", bearer("tok-2").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(server_body()))
        .expect(8)
        .mount(&server)
        .await;

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let session = session.clone();
            tokio::spawn(async move { session.get_server().await })
        })
        .collect();

    for task in tasks {
        let srv = task.await.unwrap().unwrap();
        assert_eq!(srv.id, "srv-1");
    }

    // Initial login plus exactly one renewal
    assert_eq!(logins.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn second_unauthorized_is_final() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(login_ok("tok"))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/v2/sites"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token rejected"))
        .expect(2)
        .mount(&server)
        .await;

    let session = Session::connect(&config_for(&server)).await.unwrap();
    let err = session.list_sites().await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("token rejected"));
}

#[tokio::test]
async fn failed_relogin_poisons_the_session() {
    let server = MockServer::start().await;

    // First login succeeds, every later one is rejected
    let logins = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = logins.clone();
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
            if counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 0 {
                login_ok("tok-1")
            } else {
                ResponseTemplate::new(401).set_body_string("account locked")
            }
        })
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/v2/server"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::connect(&config_for(&server)).await.unwrap();

    let err = session.get_server().await.unwrap_err();
    assert!(matches!(err, Error::Authentication(_)), "got {err:?}");
    assert!(err.to_string().contains("account locked"));
    assert!(!session.is_authenticated().await);

    // Refused locally: no further login or GET reaches the server
    let err = session.get_server().await.unwrap_err();
    assert!(matches!(err, Error::Authentication(_)), "got {err:?}");
}

#[tokio::test]
async fn debug_output_hides_credentials() {
    let server = MockServer::start().await;
    let session = connected(&server, "tok-very-secret").await;

    let debug_str = format!("{:?}", session);
    assert!(!debug_str.contains(PASSWORD));
    assert!(!debug_str.contains("tok-very-secret"));
    assert!(debug_str.contains("<REDACTED>"));
}
