//! Shared HTTP helpers for lookup modules.
//!
//! All module network calls go through here so rate-limit retry behaves
//! uniformly: HTTP 429 is retried up to `MAX_RETRIES` attempts, honouring
//! the server's `Retry-After` header when present, before surfacing
//! [`ModuleError::RateLimited`].

use crate::error::{ModuleError, ModuleResult};
use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::warn;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 500;
const RATE_LIMIT_BACKOFF_MULTIPLIER: u64 = 3;

/// Send a request, retrying on HTTP 429.
///
/// Any non-429 response (including 4xx/5xx) returns immediately; status
/// interpretation belongs to the caller. Transport errors are not retried.
///
/// # Errors
/// Returns [`ModuleError::RateLimited`] when all attempts were 429, or
/// [`ModuleError::Http`] on transport failure.
pub async fn send_with_retry(request: RequestBuilder) -> ModuleResult<Response> {
    let mut last_retry_after = None;

    for attempt in 0..MAX_RETRIES {
        let req = request.try_clone().ok_or_else(|| {
            ModuleError::InvalidResponse("request with streaming body cannot be retried".to_string())
        })?;

        let response = req.send().await?;

        if response.status() != StatusCode::TOO_MANY_REQUESTS {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        last_retry_after = retry_after;

        if attempt < MAX_RETRIES - 1 {
            let delay = retry_after.unwrap_or_else(|| {
                Duration::from_millis(
                    RETRY_DELAY_MS * RATE_LIMIT_BACKOFF_MULTIPLIER * u64::from(attempt + 1),
                )
            });

            warn!(
                attempt = attempt + 1,
                max = MAX_RETRIES,
                ?delay,
                "rate limited, retrying"
            );

            tokio::time::sleep(delay).await;
        }
    }

    Err(ModuleError::RateLimited {
        retry_after: last_retry_after,
    })
}

/// Send a request expecting a 2xx JSON body.
///
/// # Errors
/// Returns [`ModuleError::UnexpectedStatus`] for non-success statuses and
/// [`ModuleError::Http`] when the body is not valid JSON.
pub async fn fetch_json(request: RequestBuilder, service: &str) -> ModuleResult<serde_json::Value> {
    let response = send_with_retry(request).await?;

    if !response.status().is_success() {
        return Err(ModuleError::UnexpectedStatus {
            status: response.status().as_u16(),
            service: service.to_string(),
        });
    }

    Ok(response.json().await?)
}

/// Parse a `Retry-After` header value (delta-seconds form only).
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
