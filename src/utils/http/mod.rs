use anyhow::{Result, bail};
use reqwest::{Client, Response};
use std::time::Duration;

/// Connect timeout shared by every client built here.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a `reqwest::Client` with a 10 s connect timeout and the given
/// overall request timeout.
///
/// Falls back to the default client if the builder fails.
pub fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(timeout)
        .user_agent(concat!("agribid/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Largest response body the API client will buffer (4 MiB).
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Read a response body, stopping at `max_bytes`.
///
/// - Rejects up front when `Content-Length` already exceeds the limit.
/// - Streams via `chunk()` with a running counter; truncates at the limit.
/// - Returns `(bytes, was_truncated)`.
pub async fn limited_body(resp: Response, max_bytes: usize) -> Result<(Vec<u8>, bool)> {
    if let Some(len) = resp.content_length()
        && len > max_bytes as u64
    {
        bail!("response body too large: Content-Length {len} exceeds limit {max_bytes}");
    }

    let mut buf = Vec::new();
    let mut resp = resp;
    while let Some(chunk) = resp.chunk().await? {
        if buf.len() + chunk.len() > max_bytes {
            let remaining = max_bytes.saturating_sub(buf.len());
            buf.extend_from_slice(&chunk[..remaining]);
            return Ok((buf, true));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok((buf, false))
}

#[cfg(test)]
mod tests;
