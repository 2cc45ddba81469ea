//! Infallible listing source boundary.
//!
//! [`ListingSource`] is what the poller talks to. Implementations never
//! return an error: every failure is collapsed into
//! [`Sourced::Unavailable`], and the caller's fallback policy decides what to
//! show instead.

use std::fmt;

use async_trait::async_trait;
use carfeed_core::{Listing, ListingsPage, StatsSnapshot, Verdict};

use crate::client::FeedClient;
use crate::error::FeedError;

/// Result of asking a source for data.
#[derive(Debug, Clone, PartialEq)]
pub enum Sourced<T> {
    Live(T),
    Unavailable(Unavailable),
}

impl<T> Sourced<T> {
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self, Sourced::Live(_))
    }
}

/// Why a source could not deliver data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// Connection, TLS or timeout failure.
    Transport(String),
    /// Non-2xx HTTP status.
    Status(u16),
    /// Response was not JSON, usually an authentication redirect.
    NotJson { content_type: Option<String> },
    /// JSON that does not match the expected shape.
    Malformed(String),
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::Transport(reason) => write!(f, "transport failure: {reason}"),
            Unavailable::Status(status) => write!(f, "HTTP status {status}"),
            Unavailable::NotJson { content_type } => write!(
                f,
                "non-JSON response ({})",
                content_type.as_deref().unwrap_or("no content type")
            ),
            Unavailable::Malformed(reason) => write!(f, "malformed payload: {reason}"),
        }
    }
}

impl From<FeedError> for Unavailable {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::Http(e) => Unavailable::Transport(e.to_string()),
            FeedError::UnexpectedStatus { status, .. } => Unavailable::Status(status),
            FeedError::NotJson { content_type, .. } => Unavailable::NotJson { content_type },
            FeedError::Deserialize { source, .. } => Unavailable::Malformed(source.to_string()),
            FeedError::InvalidCookie(reason) | FeedError::InvalidBaseUrl { reason, .. } => {
                Unavailable::Transport(reason)
            }
        }
    }
}

impl<T> From<Result<T, FeedError>> for Sourced<T> {
    fn from(result: Result<T, FeedError>) -> Self {
        match result {
            Ok(data) => Sourced::Live(data),
            Err(e) => Sourced::Unavailable(e.into()),
        }
    }
}

/// A remote listing source that always resolves.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Listings, optionally restricted server-side to `verdict`.
    async fn listings(&self, verdict: Option<&Verdict>) -> Sourced<ListingsPage>;

    /// Summary statistics.
    async fn stats(&self) -> Sourced<StatsSnapshot>;

    /// Featured listings for the top-deals panel.
    async fn featured(&self) -> Sourced<Vec<Listing>>;
}

#[async_trait]
impl ListingSource for FeedClient {
    async fn listings(&self, verdict: Option<&Verdict>) -> Sourced<ListingsPage> {
        self.fetch_listings(verdict).await.into()
    }

    async fn stats(&self) -> Sourced<StatsSnapshot> {
        self.fetch_stats().await.into()
    }

    async fn featured(&self) -> Sourced<Vec<Listing>> {
        self.fetch_top_deals().await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_errors_map_to_unavailable_reasons() {
        let status: Unavailable = FeedError::UnexpectedStatus {
            status: 502,
            url: "http://x/".to_string(),
        }
        .into();
        assert_eq!(status, Unavailable::Status(502));

        let html: Unavailable = FeedError::NotJson {
            url: "http://x/".to_string(),
            content_type: Some("text/html".to_string()),
        }
        .into();
        assert_eq!(html.to_string(), "non-JSON response (text/html)");

        let malformed: Unavailable = FeedError::Deserialize {
            context: "deals".to_string(),
            source: serde_json::from_str::<u8>("x").unwrap_err(),
        }
        .into();
        assert!(matches!(malformed, Unavailable::Malformed(_)));
    }

    #[test]
    fn result_converts_to_sourced() {
        let ok: Sourced<u8> = Ok::<u8, FeedError>(1).into();
        assert!(ok.is_live());
        let err: Sourced<u8> = Err::<u8, FeedError>(FeedError::UnexpectedStatus {
            status: 401,
            url: "http://x/".to_string(),
        })
        .into();
        assert_eq!(err, Sourced::Unavailable(Unavailable::Status(401)));
    }
}
