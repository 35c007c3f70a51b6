//! Integration tests for the gateway client against mock servers.
//!
//! Run with: cargo test --test integration

mod auth;
mod mock_server;
mod resources;
