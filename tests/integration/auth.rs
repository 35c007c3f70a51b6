//! Login, logout, password change and startup.

use crate::mock_server::*;
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use subscription_admin::session::MemoryTokenStore;
use subscription_admin::{Error, LogoutReason, Session, SessionEvent, Startup, TokenStore};

const DELAY: Duration = Duration::from_millis(10);

#[tokio::test]
async fn test_login_stores_token_and_authenticates_next_call() {
    let mut fixture = MockServerFixture::new().await;
    let login = fixture
        .server
        .mock("POST", "/api/auth/login")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::Json(json!({"userId": "staff01", "password": "pw"})))
        .with_status(200)
        .with_body(r#"{"token":"abc123"}"#)
        .expect(1)
        .create_async()
        .await;
    let plans = fixture
        .server
        .mock("GET", "/api/plans")
        .match_header("authorization", "Bearer abc123")
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let client = fixture.client(2, DELAY);
    client.login("staff01", "pw").await.expect("login");
    let value = client.get("/api/plans").await.expect("plans");

    login.assert_async().await;
    plans.assert_async().await;
    assert_eq!(value, json!([]));
    assert_eq!(fixture.session.get().as_deref(), Some("abc123"));
    assert_eq!(fixture.store.load().await.unwrap().as_deref(), Some("abc123"));
    assert_eq!(fixture.observer.events(), vec![SessionEvent::LoggedIn]);
}

#[tokio::test]
async fn test_login_with_invalid_credentials_surfaces_server_message() {
    let mut fixture = MockServerFixture::new().await;
    let _login = fixture
        .server
        .mock("POST", "/api/auth/login")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"invalid credentials"}"#)
        .create_async()
        .await;

    let err = fixture
        .client(2, DELAY)
        .login("staff01", "wrong")
        .await
        .unwrap_err();

    assert_eq!(err.message(), "invalid credentials");
    assert_eq!(fixture.session.get(), None);
    assert_eq!(fixture.store.load().await.unwrap(), None);
    assert!(fixture.observer.events().is_empty());
}

#[tokio::test]
async fn test_login_response_without_token_is_rejected() {
    let mut fixture = MockServerFixture::new().await;
    let _login = fixture
        .server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(r#"{"message":"welcome"}"#)
        .create_async()
        .await;

    let err = fixture
        .client(1, DELAY)
        .login("staff01", "pw")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
    assert!(!fixture.session.is_authenticated());
}

#[tokio::test]
async fn test_call_after_401_carries_no_credentials() {
    let mut fixture = MockServerFixture::new().await;
    fixture.login_as("revoked").await;
    let first = fixture
        .server
        .mock("GET", "/api/staff")
        .match_header("authorization", "Bearer revoked")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let second = fixture
        .server
        .mock("GET", "/api/history")
        .match_header("authorization", Matcher::Missing)
        .with_status(401)
        .with_body(r#"{"error":"authentication required"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = fixture.client(2, DELAY);
    let err1 = client.get("/api/staff").await.unwrap_err();
    let err2 = client.get("/api/history").await.unwrap_err();

    first.assert_async().await;
    second.assert_async().await;
    assert!(err1.is_authentication());
    assert!(err2.is_authentication());
    assert_eq!(err2.message(), "authentication required");
    assert!(!fixture.session.is_authenticated());
}

#[tokio::test]
async fn test_change_password_sends_camel_case_body() {
    let mut fixture = MockServerFixture::new().await;
    fixture.login_as("tok").await;
    let mock = fixture
        .server
        .mock("POST", "/api/auth/change-password")
        .match_header("authorization", "Bearer tok")
        .match_body(Matcher::Json(json!({
            "userId": "staff01",
            "currentPassword": "old",
            "newPassword": "new-secret"
        })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    fixture
        .client(1, DELAY)
        .change_password("staff01", "old", "new-secret")
        .await
        .expect("empty ack body is a success");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_logout_clears_session_without_network() {
    let fixture = MockServerFixture::new().await;
    fixture.login_as("tok").await;

    fixture.client(1, DELAY).logout().await.unwrap();

    assert_eq!(fixture.session.get(), None);
    assert_eq!(fixture.store.load().await.unwrap(), None);
    assert_eq!(
        fixture.observer.events().last(),
        Some(&SessionEvent::LoggedOut {
            reason: LogoutReason::UserInitiated
        })
    );
}

#[tokio::test]
async fn test_bootstrap_restores_persisted_session() {
    let mut server = mockito::Server::new_async().await;
    let health = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .expect(1)
        .create_async()
        .await;

    let session = Arc::new(Session::new(Arc::new(MemoryTokenStore::with_token("kept"))));
    let client = client_for(&server.url(), session.clone(), 2, DELAY);

    assert_eq!(client.bootstrap().await.unwrap(), Startup::Authenticated);
    health.assert_async().await;
    assert_eq!(session.get().as_deref(), Some("kept"));
}

#[tokio::test]
async fn test_bootstrap_without_session_requires_login() {
    let mut fixture = MockServerFixture::new().await;
    let _health = fixture
        .server
        .mock("GET", "/health")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let startup = fixture.client(2, DELAY).bootstrap().await.unwrap();
    assert_eq!(startup, Startup::LoginRequired);
}

#[tokio::test]
async fn test_unhealthy_server_aborts_startup_without_retry() {
    let mut fixture = MockServerFixture::new().await;
    let health = fixture
        .server
        .mock("GET", "/health")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let client = fixture.client(3, DELAY);
    assert!(!client.probe().await);
    health.assert_async().await;

    let err = client.bootstrap().await.unwrap_err();
    assert!(matches!(err, Error::Connectivity { .. }));
    assert!(err.message().contains(&fixture.base_url));
}

#[tokio::test]
async fn test_probe_on_unreachable_host() {
    let base = closed_port_url().await;
    let client = client_for(&base, Arc::new(Session::ephemeral()), 2, DELAY);
    assert!(!client.probe().await);
}

#[tokio::test]
async fn test_probe_accepts_plain_text_health_body() {
    let mut fixture = MockServerFixture::new().await;
    let _health = fixture
        .server
        .mock("GET", "/health")
        .with_status(200)
        .with_body("OK")
        .create_async()
        .await;

    assert!(fixture.client(2, DELAY).probe().await);
}
