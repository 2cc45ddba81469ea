//! HTTP client for the deals service.
//!
//! Wraps `reqwest` with session-cookie handling and typed response
//! deserialization. Every endpoint runs the same checks in the same order:
//! HTTP status, then `Content-Type`, then body shape. A login redirect lands
//! on an HTML page with status 200, so the content-type check is what catches
//! an expired session.

use std::time::Duration;

use carfeed_core::{AppConfig, Listing, ListingsPage, StatsSnapshot, Verdict};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, COOKIE};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::FeedError;

pub(crate) const DEALS_PATH: &str = "api/carscraper/deals";
pub(crate) const STATS_PATH: &str = "api/carscraper/stats";
pub(crate) const TOP_DEALS_PATH: &str = "api/top-deals";

/// Client for the deals service.
///
/// Use [`FeedClient::new`] with an explicit base URL (a wiremock server in
/// tests) or [`FeedClient::from_config`] in binaries.
pub struct FeedClient {
    client: Client,
    base_url: Url,
}

impl FeedClient {
    /// Creates a client for the service rooted at `base_url`.
    ///
    /// `session_cookie` is sent verbatim as the `Cookie` header on every
    /// request, e.g. `"session=abc123"`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidBaseUrl`] if `base_url` does not parse,
    /// [`FeedError::InvalidCookie`] if the cookie is not a valid header value,
    /// or [`FeedError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        session_cookie: Option<&str>,
    ) -> Result<Self, FeedError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(cookie) = session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| FeedError::InvalidCookie(e.to_string()))?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        // Normalise to exactly one trailing slash so `join` appends to any
        // path prefix instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| FeedError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Creates a client from the application config.
    ///
    /// # Errors
    ///
    /// See [`FeedClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FeedError> {
        Self::new(
            &config.base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.session_cookie.as_deref(),
        )
    }

    /// Fetches the listing collection, optionally filtered by verdict on the
    /// server side.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Http`] on network failure.
    /// - [`FeedError::UnexpectedStatus`] on a non-2xx status.
    /// - [`FeedError::NotJson`] when the response is not `application/json`.
    /// - [`FeedError::Deserialize`] if the body does not match the expected shape.
    pub async fn fetch_listings(
        &self,
        verdict: Option<&Verdict>,
    ) -> Result<ListingsPage, FeedError> {
        let mut url = self.endpoint(DEALS_PATH)?;
        if let Some(v) = verdict {
            url.query_pairs_mut().append_pair("verdict", v.as_str());
        }
        let page: ListingsPage = self.request_json(url).await?;
        tracing::debug!(count = page.deals.len(), total = page.total, "feed: fetched listings");
        Ok(page)
    }

    /// Fetches the summary statistics.
    ///
    /// # Errors
    ///
    /// Same as [`FeedClient::fetch_listings`].
    pub async fn fetch_stats(&self) -> Result<StatsSnapshot, FeedError> {
        let url = self.endpoint(STATS_PATH)?;
        self.request_json(url).await
    }

    /// Fetches the featured listings shown by the top-deals panel.
    ///
    /// # Errors
    ///
    /// Same as [`FeedClient::fetch_listings`].
    pub async fn fetch_top_deals(&self) -> Result<Vec<Listing>, FeedError> {
        let url = self.endpoint(TOP_DEALS_PATH)?;
        self.request_json(url).await
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, FeedError> {
        self.base_url
            .join(path)
            .map_err(|e| FeedError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Sends a GET request, asserts a 2xx status and a JSON content type, and
    /// parses the body.
    async fn request_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FeedError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        if !content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"))
        {
            return Err(FeedError::NotJson {
                url: url.to_string(),
                content_type,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FeedError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
