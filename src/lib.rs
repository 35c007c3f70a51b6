//! # subscription-admin
//!
//! Client for the subscription-management admin console API.
//!
//! ## Overview
//!
//! Every operation of the console (applications, plans, subscribers, send
//! history, staff, settings) is one call through [`GatewayClient`], which
//! enforces a single policy:
//!
//! - **Timeout**: each attempt runs under a fixed deadline (default 30s)
//! - **Retry**: network errors, timeouts and non-401 HTTP errors are retried
//!   with linear backoff (`attempt * delay`, default 2 attempts / 1s)
//! - **Auth**: a 401 ends the [`Session`](session::Session) immediately and is
//!   never retried
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use subscription_admin::{GatewayClient, Startup};
//!
//! #[tokio::main]
//! async fn main() -> subscription_admin::Result<()> {
//!     let client = GatewayClient::builder()
//!         .base_url("https://admin-api.example.com")
//!         .build()?;
//!
//!     if client.bootstrap().await? == Startup::LoginRequired {
//!         client.login("staff01", "secret").await?;
//!     }
//!
//!     let plans = client.plans().list().await?;
//!     println!("{}", plans);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Gateway client, builder, retry policy |
//! | [`session`] | Bearer token, persistence, observers |
//! | [`auth`] | Login, password change, logout |
//! | [`health`] | Connectivity probe and startup |
//! | [`resources`] | REST collection accessors |
//! | [`transport`] | HTTP transport |

pub mod auth;
pub mod client;
pub mod health;
pub mod resources;
pub mod session;
pub mod transport;

pub use client::{ApiRequest, CallStats, GatewayClient, GatewayClientBuilder, RetryPolicy};
pub use health::Startup;
pub use resources::Resource;
pub use session::{LogoutReason, Session, SessionEvent, SessionObserver, TokenStore};
pub use transport::Method;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
