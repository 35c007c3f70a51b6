//! Staff authentication: login, password change, logout.

use crate::client::{ApiRequest, GatewayClient};
use crate::session::LogoutReason;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const CHANGE_PASSWORD_ENDPOINT: &str = "/api/auth/change-password";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    user_id: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest<'a> {
    user_id: &'a str,
    current_password: &'a str,
    new_password: &'a str,
}

impl GatewayClient {
    /// Exchange credentials for a token and install it in the session.
    ///
    /// On failure nothing is stored and the server's message reaches the caller.
    pub async fn login(&self, user_id: &str, password: &str) -> Result<()> {
        let request = ApiRequest::new(crate::transport::Method::Post, LOGIN_ENDPOINT)
            .json(&LoginRequest { user_id, password })?
            .public();
        let value = self.call(request).await?;

        let token = serde_json::from_value::<LoginResponse>(value)
            .ok()
            .and_then(|r| r.token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::decode(
                    "login response did not contain a token",
                    ErrorContext::new()
                        .with_endpoint(LOGIN_ENDPOINT)
                        .with_source("login"),
                )
            })?;

        self.session.set(token).await?;
        info!(user_id, "logged in");
        Ok(())
    }

    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let request = ApiRequest::new(crate::transport::Method::Post, CHANGE_PASSWORD_ENDPOINT)
            .json(&ChangePasswordRequest {
                user_id,
                current_password,
                new_password,
            })?;
        self.call(request).await?;
        info!(user_id, "password changed");
        Ok(())
    }

    /// End the session locally. No network call.
    pub async fn logout(&self) -> Result<()> {
        self.session.clear(LogoutReason::UserInitiated).await
    }
}
