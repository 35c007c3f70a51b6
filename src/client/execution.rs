//! Request execution logic (single attempt).

use crate::error::SESSION_EXPIRED_MESSAGE;
use crate::transport::Outgoing;
use crate::{Error, ErrorContext, Result};
use reqwest::StatusCode;

use super::core::GatewayClient;
use super::error_classification::error_message;
use super::types::ApiRequest;

/// Result of one successful attempt.
pub(crate) struct AttemptOutput {
    pub value: serde_json::Value,
    pub status: u16,
}

impl GatewayClient {
    /// Run one attempt: send, classify the status, decode the body.
    ///
    /// This is a single attempt (no retry, no timeout). The policy loop lives in
    /// [`GatewayClient::call_with_stats`].
    pub(crate) async fn execute_once(
        &self,
        request: &ApiRequest,
        request_id: &str,
        attempt: u32,
    ) -> Result<AttemptOutput> {
        // Read the token per attempt: a concurrent 401 may have cleared it.
        let token = if request.requires_auth {
            self.session.get()
        } else {
            None
        };

        let resp = self
            .transport
            .send(Outgoing {
                method: request.method,
                endpoint: &request.endpoint,
                body: request.body.as_ref(),
                bearer: token.as_deref(),
                request_id,
                attempt,
            })
            .await?;

        let status = resp.status();
        let context = ErrorContext::new()
            .with_endpoint(request.endpoint.as_str())
            .with_status_code(status.as_u16())
            .with_request_id(request_id)
            .with_attempt(attempt)
            .with_source("execute_once");

        if status == StatusCode::UNAUTHORIZED {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string());
            return Err(Error::Authentication { message, context });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Remote {
                status: status.as_u16(),
                message: error_message(status, &body),
                context,
            });
        }

        let bytes = resp.bytes().await.map_err(|e| {
            Error::connectivity(format!("failed to read response body: {}", e), context.clone())
        })?;

        Ok(AttemptOutput {
            value: decode_body(&bytes, context)?,
            status: status.as_u16(),
        })
    }
}

/// Decode a success body. Ack-only endpoints may answer with nothing at all.
fn decode_body(bytes: &[u8], context: ErrorContext) -> Result<serde_json::Value> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_slice(bytes)
        .map_err(|e| Error::decode(format!("response is not valid JSON: {}", e), context))
}
