use crate::transport::Method;
use serde::Serialize;

/// Description of one logical API operation.
///
/// Built per call; defaults to an authenticated request using the client's
/// retry budget.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub endpoint: String,
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub requires_auth: bool,
    /// Overrides the client's attempt budget for this call.
    pub max_attempts: Option<u32>,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            body: None,
            requires_auth: true,
            max_attempts: None,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::Post, endpoint).body(body)
    }

    pub fn put(endpoint: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::Put, endpoint).body(body)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Delete, endpoint)
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize any payload as the JSON body.
    pub fn json<T: Serialize>(self, payload: &T) -> crate::Result<Self> {
        Ok(self.body(serde_json::to_value(payload)?))
    }

    /// Send without the session token.
    pub fn public(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = Some(n);
        self
    }
}

/// Per-call statistics for observability.
#[derive(Debug, Clone, Default)]
pub struct CallStats {
    pub request_id: String,
    pub endpoint: String,
    pub method: String,
    /// Attempts made, including the successful one.
    pub attempts: u32,
    pub retry_count: u32,
    pub total_backoff_ms: u128,
    pub http_status: u16,
    pub duration_ms: u128,
}
