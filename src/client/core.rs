use crate::client::policy::{Decision, RetryPolicy};
use crate::client::types::{ApiRequest, CallStats};
use crate::session::{LogoutReason, Session};
use crate::transport::HttpTransport;
use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Gateway client for the admin API.
///
/// Cheap to clone; clones share the connection pool and the session.
#[derive(Clone)]
pub struct GatewayClient {
    pub(crate) transport: Arc<HttpTransport>,
    pub(crate) session: Arc<Session>,
    pub(crate) policy: RetryPolicy,
    pub(crate) attempt_timeout: Duration,
}

impl GatewayClient {
    pub fn builder() -> crate::client::builder::GatewayClientBuilder {
        crate::client::builder::GatewayClientBuilder::new()
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Execute one logical operation and return the decoded JSON body.
    pub async fn call(&self, request: ApiRequest) -> Result<serde_json::Value> {
        Ok(self.call_with_stats(request).await?.0)
    }

    /// Like [`call`](Self::call), decoding the body into `T`.
    pub async fn call_as<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let endpoint = request.endpoint.clone();
        let value = self.call(request).await?;
        serde_json::from_value(value).map_err(|e| {
            Error::decode(
                format!("unexpected response shape: {}", e),
                ErrorContext::new().with_endpoint(endpoint),
            )
        })
    }

    pub async fn get(&self, endpoint: &str) -> Result<serde_json::Value> {
        self.call(ApiRequest::get(endpoint)).await
    }

    pub async fn post(&self, endpoint: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        self.call(ApiRequest::post(endpoint, body)).await
    }

    pub async fn put(&self, endpoint: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        self.call(ApiRequest::put(endpoint, body)).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<serde_json::Value> {
        self.call(ApiRequest::delete(endpoint)).await
    }

    /// Execute one logical operation and also return per-call stats.
    ///
    /// Attempts run strictly one after another. Each runs under the attempt
    /// timeout; a 401 tears the session down and ends the call at once; any
    /// other failure is retried with linear backoff until the budget is spent.
    pub async fn call_with_stats(
        &self,
        request: ApiRequest,
    ) -> Result<(serde_json::Value, CallStats)> {
        let policy = match request.max_attempts {
            Some(n) => self.policy.with_max_attempts(n),
            None => self.policy,
        };
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();
        let mut stats = CallStats {
            request_id: request_id.clone(),
            endpoint: request.endpoint.clone(),
            method: request.method.to_string(),
            ..CallStats::default()
        };
        let mut attempt: u32 = 1;

        loop {
            let attempt_start = Instant::now();
            let attempt_res = match tokio::time::timeout(
                self.attempt_timeout,
                self.execute_once(&request, &request_id, attempt),
            )
            .await
            {
                Ok(r) => r,
                Err(_) => Err(Error::timeout(
                    self.attempt_timeout,
                    ErrorContext::new()
                        .with_endpoint(request.endpoint.as_str())
                        .with_request_id(request_id.as_str())
                        .with_attempt(attempt)
                        .with_source("call"),
                )),
            };
            stats.attempts = attempt;

            let e = match attempt_res {
                Ok(out) => {
                    stats.http_status = out.status;
                    stats.duration_ms = start.elapsed().as_millis();
                    info!(
                        method = %request.method,
                        endpoint = request.endpoint.as_str(),
                        attempt,
                        max_attempts = policy.max_attempts(),
                        http_status = out.status,
                        duration_ms = attempt_start.elapsed().as_millis(),
                        request_id = request_id.as_str(),
                        "request succeeded"
                    );
                    return Ok((out.value, stats));
                }
                Err(e) => e,
            };

            if e.is_authentication() {
                error!(
                    method = %request.method,
                    endpoint = request.endpoint.as_str(),
                    attempt,
                    request_id = request_id.as_str(),
                    "request unauthorized; ending session"
                );
                // The 401 is what the caller needs to see; a store failure is only logged.
                let _ = self.session.clear(LogoutReason::Unauthorized).await;
                return Err(e);
            }

            match policy.decide(&e, attempt) {
                Decision::Retry { delay } => {
                    warn!(
                        method = %request.method,
                        endpoint = request.endpoint.as_str(),
                        attempt,
                        max_attempts = policy.max_attempts(),
                        http_status = e.status().unwrap_or(0),
                        duration_ms = attempt_start.elapsed().as_millis(),
                        request_id = request_id.as_str(),
                        error = %e,
                        "request attempt failed; retrying"
                    );
                    debug!(delay_ms = delay.as_millis(), "backing off");
                    tokio::time::sleep(delay).await;
                    stats.retry_count = stats.retry_count.saturating_add(1);
                    stats.total_backoff_ms += delay.as_millis();
                    attempt = attempt.saturating_add(1);
                }
                Decision::Exhausted => {
                    error!(
                        method = %request.method,
                        endpoint = request.endpoint.as_str(),
                        attempt,
                        max_attempts = policy.max_attempts(),
                        http_status = e.status().unwrap_or(0),
                        request_id = request_id.as_str(),
                        error = %e,
                        "request failed; retry budget exhausted"
                    );
                    return Err(Error::Exhausted {
                        attempts: attempt,
                        last: Some(Box::new(e)),
                    });
                }
                Decision::Fail => {
                    error!(
                        method = %request.method,
                        endpoint = request.endpoint.as_str(),
                        attempt,
                        request_id = request_id.as_str(),
                        error = %e,
                        "request failed"
                    );
                    return Err(e);
                }
            }
        }
    }
}
