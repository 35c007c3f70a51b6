//! Mock HTTP server setup for integration tests

use mockito::{Server, ServerGuard};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use subscription_admin::session::{MemoryTokenStore, RecordingSessionObserver, Session};
use subscription_admin::{Error, GatewayClient, TokenStore};
use tokio::net::TcpListener;

/// Test fixture that owns a mockito server plus the session wiring.
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
    pub store: Arc<MemoryTokenStore>,
    pub observer: Arc<RecordingSessionObserver>,
    pub session: Arc<Session>,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        let store = Arc::new(MemoryTokenStore::new());
        let observer = Arc::new(RecordingSessionObserver::new());
        let session = Arc::new(Session::new(store.clone()));
        session.add_observer(observer.clone());
        Self {
            server,
            base_url,
            store,
            observer,
            session,
        }
    }

    /// A client with `max_attempts` and a short backoff unit.
    pub fn client(&self, max_attempts: u32, retry_delay: Duration) -> GatewayClient {
        client_for(&self.base_url, self.session.clone(), max_attempts, retry_delay)
    }

    pub async fn login_as(&self, token: &str) {
        self.session.set(token).await.expect("set token");
    }
}

pub fn client_for(
    base_url: &str,
    session: Arc<Session>,
    max_attempts: u32,
    retry_delay: Duration,
) -> GatewayClient {
    GatewayClient::builder()
        .base_url(base_url)
        .session(session)
        .max_attempts(max_attempts)
        .retry_delay(retry_delay)
        .attempt_timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to build client")
}

/// Token store whose `clear` always fails.
#[derive(Default)]
pub struct FailingClearStore {
    inner: MemoryTokenStore,
}

#[async_trait]
impl TokenStore for FailingClearStore {
    async fn load(&self) -> subscription_admin::Result<Option<String>> {
        self.inner.load().await
    }

    async fn save(&self, token: &str) -> subscription_admin::Result<()> {
        self.inner.save(token).await
    }

    async fn clear(&self) -> subscription_admin::Result<()> {
        Err(Error::store("keyring locked"))
    }

    fn name(&self) -> &'static str {
        "failing-clear"
    }
}

/// A base URL nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}
