//! Network transport for the gateway client.

mod http;

pub use http::{HttpTransport, Method};
pub(crate) use http::Outgoing;
