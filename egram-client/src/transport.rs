//! Thin reqwest wrapper that parses the platform's `{ ok, result }` envelope
//! and classifies rejections.

use std::time::Duration;

use reqwest::multipart::Form;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use egram_core::{ApiError, Result};

/// Default whole-request timeout. Sized to sit above the 30 s server-side
/// long-poll wait.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(35);

/// HTTP transport shared by every endpoint wrapper.
#[derive(Debug, Clone)]
pub struct Request {
    client: reqwest::Client,
    timeout: Duration,
}

impl Request {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        }
    }

    pub async fn get_json<P>(&self, url: &str, params: &P) -> Result<Value>
    where
        P: Serialize + ?Sized,
    {
        let response = self
            .client
            .get(url)
            .query(params)
            .timeout(self.timeout)
            .send()
            .await?;
        debug!(url, status = %response.status(), "request (get)");
        let value: Value = response.json().await?;
        check_envelope(value)
    }

    pub async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await?;
        debug!(url, status = %response.status(), "request (post)");
        let value: Value = response.json().await?;
        check_envelope(value)
    }

    pub async fn post_multipart(&self, url: &str, form: Form) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await?;
        debug!(url, status = %response.status(), "request (multipart post)");
        let value: Value = response.json().await?;
        check_envelope(value)
    }

    /// Raw body fetch, used for file downloads (no envelope).
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).timeout(self.timeout).send().await?;
        debug!(url, status = %response.status(), "request (download)");
        Ok(response.bytes().await?.to_vec())
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Unwraps `result` from a success envelope, or classifies the rejection by
/// its description: `unauthorized`, `bad request...`, `forbidden...`,
/// `too many requests...` (carrying `parameters.retry_after`), else generic.
pub(crate) fn check_envelope(value: Value) -> Result<Value> {
    let ok = value.get("ok").and_then(Value::as_bool).unwrap_or(false);
    if ok {
        return Ok(value.get("result").cloned().unwrap_or(Value::Null));
    }

    let description = value
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase();

    let error = if description == "unauthorized" {
        ApiError::Unauthorized(description)
    } else if description.starts_with("bad request") {
        ApiError::BadRequest(description)
    } else if description.starts_with("forbidden") {
        ApiError::Forbidden(description)
    } else if description.starts_with("too many requests") {
        let retry_after = value
            .pointer("/parameters/retry_after")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        ApiError::TooManyRequests {
            description,
            retry_after,
        }
    } else {
        ApiError::Other(description)
    };

    Err(error.into())
}
