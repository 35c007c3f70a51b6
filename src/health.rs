//! Connectivity probe and startup sequencing.

use crate::client::{ApiRequest, GatewayClient};
use crate::{Error, ErrorContext, Result};
use tracing::{info, warn};
use uuid::Uuid;

pub const HEALTH_ENDPOINT: &str = "/health";

/// Where startup landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Startup {
    /// A persisted token was restored; the dashboard can be shown.
    Authenticated,
    /// No stored session; show the login view.
    LoginRequired,
}

impl GatewayClient {
    /// Single unauthenticated `GET /health`.
    ///
    /// No retry. `true` only for an HTTP 200 within the attempt timeout.
    pub async fn probe(&self) -> bool {
        let request = ApiRequest::get(HEALTH_ENDPOINT).public();
        let request_id = Uuid::new_v4().to_string();
        let res = tokio::time::timeout(
            self.attempt_timeout,
            self.execute_once(&request, &request_id, 1),
        )
        .await;

        match res {
            Ok(Ok(out)) if out.status == 200 => {
                info!(base_url = self.base_url(), "API server reachable");
                true
            }
            // 200 with a body that is not JSON still counts as reachable
            Ok(Err(Error::Decode { context, .. })) if context.status_code == Some(200) => {
                info!(base_url = self.base_url(), "API server reachable");
                true
            }
            Ok(Ok(out)) => {
                warn!(base_url = self.base_url(), http_status = out.status, "health check returned non-200");
                false
            }
            Ok(Err(e)) => {
                warn!(base_url = self.base_url(), error = %e, "health check failed");
                false
            }
            Err(_) => {
                warn!(
                    base_url = self.base_url(),
                    timeout_ms = self.attempt_timeout.as_millis(),
                    "health check timed out"
                );
                false
            }
        }
    }

    /// Probe the server, then restore any persisted session.
    ///
    /// An unreachable server aborts startup with a diagnostic naming the base URL.
    pub async fn bootstrap(&self) -> Result<Startup> {
        if !self.probe().await {
            return Err(Error::connectivity(
                format!(
                    "cannot reach the API server at {}; check that it is running",
                    self.base_url()
                ),
                ErrorContext::new()
                    .with_endpoint(HEALTH_ENDPOINT)
                    .with_source("bootstrap"),
            ));
        }

        if self.session.restore().await? {
            info!("restored persisted session");
            Ok(Startup::Authenticated)
        } else {
            Ok(Startup::LoginRequired)
        }
    }
}
