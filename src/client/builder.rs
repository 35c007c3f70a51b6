use crate::client::core::GatewayClient;
use crate::client::policy::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};
use crate::session::{KeyringTokenStore, Session, SessionObserver, TokenStore};
use crate::transport::HttpTransport;
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;

/// Compiled-in API origin.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default per-attempt deadline.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`GatewayClient`].
///
/// Precedence for each knob: explicit setter, then environment, then default:
/// - `SUBADMIN_HTTP_TIMEOUT_SECS` (default 30)
/// - `SUBADMIN_MAX_ATTEMPTS` (default 2)
/// - `SUBADMIN_RETRY_DELAY_MS` (default 1000)
/// - `SUBADMIN_PROXY_URL` (unset)
pub struct GatewayClientBuilder {
    base_url: Option<String>,
    attempt_timeout: Option<Duration>,
    max_attempts: Option<u32>,
    retry_delay: Option<Duration>,
    session: Option<Arc<Session>>,
    token_store: Option<Arc<dyn TokenStore>>,
    observers: Vec<Arc<dyn SessionObserver>>,
}

impl GatewayClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            attempt_timeout: None,
            max_attempts: None,
            retry_delay: None,
            session: None,
            token_store: None,
            observers: Vec::new(),
        }
    }

    /// Override the compiled-in base URL (other deployments, mock servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = Some(n.max(1));
        self
    }

    /// Backoff unit: attempt `n` waits `n * delay` before the next one.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Share an existing session instead of creating one.
    ///
    /// When set, `token_store` and `observer` are ignored.
    pub fn session(mut self, session: Arc<Session>) -> Self {
        self.session = Some(session);
        self
    }

    /// Token persistence for a new session. Default is the OS keyring.
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<GatewayClient> {
        let raw_base = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = url::Url::parse(&raw_base)
            .map_err(|e| Error::configuration(format!("invalid base URL '{}': {}", raw_base, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::configuration(format!(
                "base URL must be http or https: {}",
                raw_base
            )));
        }

        let proxy_url = std::env::var("SUBADMIN_PROXY_URL").ok();
        let transport = Arc::new(HttpTransport::new(&base_url, proxy_url.as_deref())?);

        let attempt_timeout = self.attempt_timeout.unwrap_or_else(|| {
            env_u64("SUBADMIN_HTTP_TIMEOUT_SECS")
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_ATTEMPT_TIMEOUT)
        });
        let max_attempts = self.max_attempts.unwrap_or_else(|| {
            env_u64("SUBADMIN_MAX_ATTEMPTS")
                .map(|n| n.min(u32::MAX as u64) as u32)
                .unwrap_or(DEFAULT_MAX_ATTEMPTS)
        });
        let retry_delay = self.retry_delay.unwrap_or_else(|| {
            env_u64("SUBADMIN_RETRY_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_RETRY_DELAY)
        });

        let session = match self.session {
            Some(s) => s,
            None => {
                let store = self
                    .token_store
                    .unwrap_or_else(|| Arc::new(KeyringTokenStore::new()));
                let session = Session::new(store);
                for observer in self.observers {
                    session.add_observer(observer);
                }
                Arc::new(session)
            }
        };

        Ok(GatewayClient {
            transport,
            session,
            policy: RetryPolicy::new(max_attempts, retry_delay),
            attempt_timeout,
        })
    }
}

impl Default for GatewayClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|s| s.trim().parse::<u64>().ok())
}
