//! Session change notifications.
//!
//! Observers replace direct UI manipulation: a front end registers one and
//! switches to its login view on [`SessionEvent::LoggedOut`].

use async_trait::async_trait;
use std::sync::RwLock;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// Explicit logout requested by the user.
    UserInitiated,
    /// The server answered 401; the token is no longer valid.
    Unauthorized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut { reason: LogoutReason },
}

/// Destination for session events.
#[async_trait]
pub trait SessionObserver: Send + Sync {
    async fn notify(&self, event: SessionEvent);
}

/// Emits each event through `tracing`.
pub struct LoggingSessionObserver;

#[async_trait]
impl SessionObserver for LoggingSessionObserver {
    async fn notify(&self, event: SessionEvent) {
        match event {
            SessionEvent::LoggedIn => tracing::info!("session established"),
            SessionEvent::LoggedOut { reason } => {
                tracing::info!(reason = ?reason, "session ended")
            }
        }
    }
}

/// Keeps every event in memory, for tests and diagnostics.
#[derive(Default)]
pub struct RecordingSessionObserver {
    events: RwLock<Vec<SessionEvent>>,
}

impl RecordingSessionObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events
            .read()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    pub fn logouts(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, SessionEvent::LoggedOut { .. }))
            .count()
    }
}

#[async_trait]
impl SessionObserver for RecordingSessionObserver {
    async fn notify(&self, event: SessionEvent) {
        if let Ok(mut events) = self.events.write() {
            events.push(event);
        }
    }
}
