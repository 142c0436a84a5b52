//! Turn a terminal HTTP response into a structured [`ApiError`].

use super::error::ApiError;

const UNAUTHORIZED_MESSAGE: &str = "authentication failed: invalid or expired token";
const FORBIDDEN_MESSAGE: &str = "access denied: insufficient permissions";
const NOT_FOUND_MESSAGE: &str = "resource not found";

/// Classify a non-success response. Never fails: a body that is not JSON, or
/// JSON without a usable `error`/`message` string, just leaves the message to
/// the per-status default (or empty, in which case the raw body is displayed).
pub fn classify(status: u16, body: &[u8]) -> ApiError {
    let message = extract_message(body)
        .or_else(|| default_message(status).map(str::to_string))
        .unwrap_or_default();

    ApiError {
        status,
        message,
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

/// `error` wins over `message` when both are present and non-empty.
fn extract_message(body: &[u8]) -> Option<String> {
    let json: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["error", "message"]
        .iter()
        .filter_map(|field| json.get(field).and_then(|v| v.as_str()))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn default_message(status: u16) -> Option<&'static str> {
    match status {
        401 => Some(UNAUTHORIZED_MESSAGE),
        403 => Some(FORBIDDEN_MESSAGE),
        404 => Some(NOT_FOUND_MESSAGE),
        _ => None,
    }
}
