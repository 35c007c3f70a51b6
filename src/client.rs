//! Gateway client for the admin API.
//!
//! Keep the public surface small: build a [`GatewayClient`], describe an
//! operation with [`ApiRequest`], call it. Retry, timeout and 401 handling
//! live in submodules under `src/client/`.

pub mod builder;
pub mod core;
mod error_classification;
mod execution;
pub mod policy;
pub mod types;

pub use builder::{GatewayClientBuilder, DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_BASE_URL};
pub use core::GatewayClient;
pub use policy::{Decision, RetryPolicy};
pub use types::{ApiRequest, CallStats};
