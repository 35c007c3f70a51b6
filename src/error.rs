use thiserror::Error;

/// Generic message used when a call ends without any recorded failure.
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Connection error: the server could not be reached. Please try again later.";

/// Message used for a 401 response whose body carries no `error` field.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// Structured error context for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Endpoint path the failing request targeted (e.g. "/api/plans")
    pub endpoint: Option<String>,
    /// HTTP status code, when a response was received
    pub status_code: Option<u16>,
    /// Client-generated correlation id (`x-request-id`)
    pub request_id: Option<String>,
    /// 1-based attempt index the failure was observed on
    pub attempt: Option<u32>,
    /// Component that produced the error (e.g. "execute_once", "token_store")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_status_code(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Unified error type for the gateway client.
///
/// Every terminal state of a call maps to exactly one of these variants.
/// Callers normally only display [`Error::message`]; the one extra fact an
/// [`Error::Authentication`] carries is that the session was already torn down.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Connection error: {message}{}", format_context(.context))]
    Connectivity {
        message: String,
        context: ErrorContext,
    },

    #[error("Request timed out after {timeout_ms}ms{}", format_context(.context))]
    Timeout {
        timeout_ms: u64,
        context: ErrorContext,
    },

    #[error("Server error: HTTP {status}: {message}{}", format_context(.context))]
    Remote {
        status: u16,
        message: String,
        context: ErrorContext,
    },

    #[error("Invalid response: {message}{}", format_context(.context))]
    Decode {
        message: String,
        context: ErrorContext,
    },

    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        context: ErrorContext,
    },

    #[error("Request failed after {attempts} attempt(s): {}", exhausted_message(.last))]
    Exhausted {
        attempts: u32,
        last: Option<Box<Error>>,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Token store error: {message}")]
    Store { message: String },
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref endpoint) = ctx.endpoint {
        parts.push(format!("endpoint: {}", endpoint));
    }
    if let Some(attempt) = ctx.attempt {
        parts.push(format!("attempt: {}", attempt));
    }
    if let Some(ref id) = ctx.request_id {
        parts.push(format!("request_id: {}", id));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn exhausted_message(last: &Option<Box<Error>>) -> String {
    match last {
        Some(e) => e.to_string(),
        None => CONNECTION_ERROR_MESSAGE.to_string(),
    }
}

impl Error {
    pub fn connectivity(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Connectivity {
            message: msg.into(),
            context,
        }
    }

    pub fn timeout(timeout: std::time::Duration, context: ErrorContext) -> Self {
        Error::Timeout {
            timeout_ms: timeout.as_millis() as u64,
            context,
        }
    }

    pub fn decode(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Decode {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
        }
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Error::Store {
            message: msg.into(),
        }
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// 401 is never retryable: the session is gone and retrying cannot fix it.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Connectivity { .. }
                | Error::Timeout { .. }
                | Error::Remote { .. }
                | Error::Decode { .. }
        )
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }

    /// The human-readable message a caller should show.
    ///
    /// For [`Error::Exhausted`] this is the message of the last underlying failure.
    pub fn message(&self) -> String {
        match self {
            Error::Connectivity { message, .. }
            | Error::Remote { message, .. }
            | Error::Decode { message, .. }
            | Error::Authentication { message, .. }
            | Error::Configuration { message }
            | Error::Store { message } => message.clone(),
            Error::Timeout { .. } => {
                "The request timed out. Please check your connection and try again.".to_string()
            }
            Error::Exhausted { last, .. } => match last {
                Some(e) => e.message(),
                None => CONNECTION_ERROR_MESSAGE.to_string(),
            },
            Error::Serialization(e) => e.to_string(),
        }
    }

    /// HTTP status carried by the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            Error::Authentication { .. } => Some(401),
            Error::Exhausted { last, .. } => last.as_ref().and_then(|e| e.status()),
            _ => self.context().and_then(|c| c.status_code),
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Connectivity { context, .. }
            | Error::Timeout { context, .. }
            | Error::Remote { context, .. }
            | Error::Decode { context, .. }
            | Error::Authentication { context, .. } => Some(context),
            Error::Exhausted { last, .. } => last.as_ref().and_then(|e| e.context()),
            _ => None,
        }
    }
}
