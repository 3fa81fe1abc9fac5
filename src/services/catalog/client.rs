use std::time::Duration;

use governor::{
    Quota, RateLimiter, clock::DefaultClock, state::InMemoryState, state::direct::NotKeyed,
};
use serde_json::Value;

use crate::error::LookupError;
use crate::ports::catalog::CatalogLookup;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Catalog lookups over HTTP, spaced out by a rate limiter.
pub struct HttpCatalogLookup {
    client: reqwest::Client,
    access_token: Option<String>,
    timeout: Duration,
    // None when spacing is disabled
    rate_limiter: Option<DirectRateLimiter>,
}

impl HttpCatalogLookup {
    pub fn new(request_spacing: Duration, timeout: Duration, access_token: Option<String>) -> Self {
        // One request per `request_spacing`, no bursts.
        let rate_limiter = Quota::with_period(request_spacing).map(RateLimiter::direct);
        Self {
            client: reqwest::Client::new(),
            access_token,
            timeout,
            rate_limiter,
        }
    }
}

#[async_trait::async_trait]
impl CatalogLookup for HttpCatalogLookup {
    async fn lookup(&self, url: &str) -> Result<Value, LookupError> {
        if let Some(rate_limiter) = &self.rate_limiter {
            rate_limiter.until_ready().await;
        }

        log::debug!("Catalog lookup: {}", url);

        let mut request = self.client.get(url).timeout(self.timeout);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("Catalog lookup {} failed with status {}", url, status);
            return Err(LookupError::Status {
                code: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_body(url, &body)
    }
}

/// Turns a successful response body into JSON, surfacing error payloads.
fn parse_body(url: &str, body: &str) -> Result<Value, LookupError> {
    let value: Value = serde_json::from_str(body).map_err(|error| LookupError::Malformed {
        url: url.to_string(),
        reason: error.to_string(),
    })?;

    if value.get("error").is_some() {
        return Err(LookupError::Service { payload: value });
    }

    Ok(value)
}
