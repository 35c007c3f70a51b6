//! Turning non-success responses into error messages.

use reqwest::StatusCode;

/// Pick the message for a non-success response.
///
/// Uses the string `error` field of a JSON body. A body that is not JSON and a
/// JSON body without a string `error` are treated the same: the message is
/// synthesized from the status line.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    message_from_body(body).unwrap_or_else(|| synthesize(status))
}

fn message_from_body(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    json.get("error")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn synthesize(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}
