//! Shared HTTP response helpers for the Notion client.
//!
//! Centralizes status-code checks (429 rate limiting with `Retry-After`
//! parsing, non-success → [`TargetError::Api`] with Notion's error `code`)
//! and the optional rate-limit retry loop.

use std::time::Duration;

use kn_core::errors::TargetError;
use serde::Deserialize;

/// Notion's JSON error envelope.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`TargetError::RateLimited`] with
///   `Retry-After` header parsing (falls back to 60 s if absent or
///   unparseable).
/// - **Non-success status** → [`TargetError::Api`] with the status code and
///   the `code`/`message` of Notion's error body when it has one.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, TargetError> {
    if resp.status() == 429 {
        return Err(TargetError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => (body.code, body.message.unwrap_or(text)),
            Err(_) => (None, text),
        };
        return Err(TargetError::Api {
            status,
            code,
            message,
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

/// Send the request produced by `build`, re-sending it up to `max_retries`
/// times when Notion answers 429. Any other outcome is returned as is.
pub async fn send_with_retry<F>(
    max_retries: u32,
    mut build: F,
) -> Result<reqwest::Response, TargetError>
where
    F: FnMut() -> Result<reqwest::RequestBuilder, TargetError>,
{
    let mut attempt = 0;
    loop {
        let resp = build()?
            .send()
            .await
            .map_err(|e| TargetError::Http(e.to_string()))?;
        match check_response(resp).await {
            Err(TargetError::RateLimited { retry_after_secs }) if attempt < max_retries => {
                attempt += 1;
                tracing::warn!(
                    attempt,
                    max_retries,
                    retry_after_secs,
                    "Notion rate limit hit; waiting before retry"
                );
                tokio::time::sleep(Duration::from_secs(retry_after_secs)).await;
            }
            other => return other,
        }
    }
}

/// Decode a successful JSON response body.
pub async fn decode<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, TargetError> {
    resp.json()
        .await
        .map_err(|e| TargetError::Parse(e.to_string()))
}
