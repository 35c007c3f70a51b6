//! Session state: the single bearer token shared by every call.
//!
//! A [`Session`] is owned by the application and handed to the gateway client
//! behind an `Arc`. Only login ([`Session::set`]) and logout or 401 teardown
//! ([`Session::clear`]) mutate it; everything else just reads the token to
//! attach credentials.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`store`] | Durable token persistence (keyring, memory) |
//! | [`observer`] | Notification of login / logout events |

pub mod observer;
pub mod store;

pub use observer::{
    LoggingSessionObserver, LogoutReason, RecordingSessionObserver, SessionEvent,
    SessionObserver,
};
pub use store::{KeyringTokenStore, MemoryTokenStore, TokenStore};

use crate::{Error, Result};
use std::sync::{Arc, RwLock};
use tracing::warn;

pub struct Session {
    token: RwLock<Option<String>>,
    store: Arc<dyn TokenStore>,
    observers: RwLock<Vec<Arc<dyn SessionObserver>>>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            token: RwLock::new(None),
            store,
            observers: RwLock::new(Vec::new()),
        }
    }

    /// An in-memory session with nothing persisted.
    pub fn ephemeral() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    pub fn add_observer(&self, observer: Arc<dyn SessionObserver>) {
        if let Ok(mut observers) = self.observers.write() {
            observers.push(observer);
        }
    }

    /// Current token, if logged in.
    pub fn get(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    /// Load a persisted token into memory. Returns whether one was found.
    pub async fn restore(&self) -> Result<bool> {
        let loaded = self.store.load().await?;
        let found = loaded.is_some();
        *self.token.write().map_err(|_| poisoned())? = loaded;
        Ok(found)
    }

    /// Install a new token, persist it and notify observers.
    pub async fn set(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        self.store.save(&token).await?;
        *self.token.write().map_err(|_| poisoned())? = Some(token);
        self.emit(SessionEvent::LoggedIn).await;
        Ok(())
    }

    /// Tear the session down: memory first, then the store, then observers.
    ///
    /// The in-memory token is gone even if the store fails, so no later call
    /// can attach it.
    pub async fn clear(&self, reason: LogoutReason) -> Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        let persisted = self.store.clear().await;
        if let Err(ref e) = persisted {
            warn!(store = self.store.name(), error = %e, "failed to clear persisted token");
        }
        self.emit(SessionEvent::LoggedOut { reason }).await;
        persisted
    }

    async fn emit(&self, event: SessionEvent) {
        let observers: Vec<Arc<dyn SessionObserver>> = self
            .observers
            .read()
            .map(|o| o.clone())
            .unwrap_or_default();
        for observer in observers {
            observer.notify(event.clone()).await;
        }
    }
}

fn poisoned() -> Error {
    Error::store("session lock poisoned")
}

impl Default for Session {
    fn default() -> Self {
        Self::ephemeral()
    }
}
