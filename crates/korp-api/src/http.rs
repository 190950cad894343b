//! Shared HTTP response helpers.
//!
//! Centralizes status-code checks and error-body extraction so the session,
//! corpus and classifier calls stay focused on request construction:
//! - **401** → [`ApiError::Unauthorized`]
//! - **other non-success** → [`ApiError::Api`] with the server's `error`
//!   message, the raw body, or the canonical status reason
//! - **success carrying an `error` key** → [`ApiError::Api`]

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Check an HTTP response for error status codes.
///
/// Returns the response unchanged on success.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| fallback_message(status, &body));
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized { message });
    }
    Err(ApiError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Decode a successful reply, treating an `error` key as an application failure.
pub async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status().as_u16();
    let body = resp.text().await?;
    let value: Value = serde_json::from_str(&body)
        .map_err(|e| ApiError::Decode(format!("invalid JSON: {e}")))?;

    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(ApiError::Api {
            status,
            message: message.to_string(),
        });
    }

    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Pull the `error` string out of a JSON body.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(str::to_string)
}

fn fallback_message(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_string)
}
