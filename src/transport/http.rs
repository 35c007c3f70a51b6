use crate::{Error, ErrorContext, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Proxy;
use std::fmt;
use std::time::Duration;

/// TCP connect deadline, separate from the per-attempt timeout.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// The HTTP methods the admin API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Only POST and PUT carry a JSON body.
    pub fn carries_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            other => Err(Error::configuration(format!(
                "unsupported HTTP method: {}",
                other
            ))),
        }
    }
}

/// One outgoing request, already resolved by the client.
pub struct Outgoing<'a> {
    pub method: Method,
    pub endpoint: &'a str,
    pub body: Option<&'a serde_json::Value>,
    pub bearer: Option<&'a str>,
    pub request_id: &'a str,
    pub attempt: u32,
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &url::Url, proxy_url: Option<&str>) -> Result<Self> {
        // No cookie store: requests never carry ambient credentials.
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .connect_timeout(CONNECT_TIMEOUT);

        if let Some(proxy_url) = proxy_url {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| Error::configuration(format!("invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Append an endpoint path to the fixed base URL.
    pub fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// Issue a single request. No retry, no timeout beyond connect.
    pub async fn send(&self, out: Outgoing<'_>) -> Result<reqwest::Response> {
        let url = self.url_for(out.endpoint);
        let mut request = match out.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        request = request
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header("x-request-id", out.request_id)
            .header("x-request-attempt", out.attempt.to_string());

        if let Some(token) = out.bearer {
            request = request.bearer_auth(token);
        }

        if out.method.carries_body() {
            if let Some(body) = out.body {
                request = request.body(serde_json::to_vec(body)?);
            }
        }

        request.send().await.map_err(|e| {
            let context = ErrorContext::new()
                .with_endpoint(out.endpoint)
                .with_request_id(out.request_id)
                .with_attempt(out.attempt)
                .with_source("http_transport");
            classify_send_error(e, context)
        })
    }
}

/// Map a reqwest failure to the client's error taxonomy.
fn classify_send_error(e: reqwest::Error, context: ErrorContext) -> Error {
    if e.is_timeout() {
        // connect timeout; the attempt deadline itself is enforced by the caller
        return Error::timeout(CONNECT_TIMEOUT, context);
    }
    if e.is_builder() {
        return Error::configuration(format!("invalid request: {}", e));
    }
    Error::connectivity(
        format!("{} ({})", crate::error::CONNECTION_ERROR_MESSAGE, e),
        context,
    )
}
