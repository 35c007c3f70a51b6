//! Durable storage for the bearer token.

use crate::{Error, Result};
use async_trait::async_trait;
use keyring::Entry;
use std::sync::RwLock;

/// Keyring service name the token is stored under.
pub const KEYRING_SERVICE: &str = "subscription-admin";
/// Keyring user name the token is stored under.
pub const KEYRING_USER: &str = "session-token";

/// Persistence for the one session token. Absence means logged out.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<String>>;
    async fn save(&self, token: &str) -> Result<()>;
    async fn clear(&self) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// OS keyring backed store, keyed by a fixed service/user pair.
pub struct KeyringTokenStore {
    service: String,
    user: String,
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self::with_names(KEYRING_SERVICE, KEYRING_USER)
    }

    pub fn with_names(service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            user: user.into(),
        }
    }

    /// Run one keyring operation on the blocking pool; the OS keyring API is synchronous.
    async fn with_entry<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Entry) -> Result<T> + Send + 'static,
    {
        let (service, user) = (self.service.clone(), self.user.clone());
        run_blocking(move || {
            let entry = Entry::new(&service, &user)
                .map_err(|e| Error::store(format!("keyring entry unavailable: {}", e)))?;
            op(entry)
        })
        .await
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::store(format!("keyring task failed: {}", e)))?
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for KeyringTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        self.with_entry(|entry| match entry.get_password() {
            Ok(token) if !token.is_empty() => Ok(Some(token)),
            Ok(_) | Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(Error::store(format!("failed to read token: {}", e))),
        })
        .await
    }

    async fn save(&self, token: &str) -> Result<()> {
        let token = token.to_string();
        self.with_entry(move |entry| {
            entry
                .set_password(&token)
                .map_err(|e| Error::store(format!("failed to persist token: {}", e)))
        })
        .await
    }

    async fn clear(&self) -> Result<()> {
        self.with_entry(|entry| match entry.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(Error::store(format!("failed to delete token: {}", e))),
        })
        .await
    }

    fn name(&self) -> &'static str {
        "keyring"
    }
}

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously persisted token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    fn poisoned() -> Error {
        Error::store("memory token store poisoned")
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.token.read().map_err(|_| Self::poisoned())?.clone())
    }

    async fn save(&self, token: &str) -> Result<()> {
        *self.token.write().map_err(|_| Self::poisoned())? = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.token.write().map_err(|_| Self::poisoned())? = None;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
