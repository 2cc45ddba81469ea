//! Listing payload types for the remote deals service.
//!
//! ## Observed shape of `/api/carscraper/deals`
//!
//! ### `id`
//! Database rows serialize as integers; the demo payloads served by the
//! featured panel use strings such as `"demo-1"`. [`ListingId`] accepts both.
//!
//! ### `price`, `market_value`, `profit`
//! Floats, or `null` when the scraper could not read a value. `profit` is
//! whatever the valuation service stored; [`Listing::profit`] recomputes it
//! from `market_value - price` when both are present.
//!
//! ### `created_at`
//! `isoformat()` output from a naive UTC timestamp, so usually *without* an
//! offset (`"2025-03-01T10:15:00.123456"`). RFC 3339 strings with an offset
//! are accepted too.
//!
//! ### `full_specs`
//! Only present on detail payloads. Opaque to filtering and aggregation.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a listing, stable across refreshes for the same ad.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListingId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingId::Int(id) => write!(f, "{id}"),
            ListingId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ListingId {
    fn from(id: i64) -> Self {
        ListingId::Int(id)
    }
}

impl From<&str> for ListingId {
    fn from(id: &str) -> Self {
        ListingId::Text(id.to_owned())
    }
}

/// Classification tag assigned by the external scoring process.
///
/// The set of values is open; only [`Verdict::RECOMMENDED`] carries meaning
/// for the feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Verdict(String);

impl Verdict {
    /// The verdict meaning "recommended purchase".
    pub const RECOMMENDED: &'static str = "KÚPIŤ";

    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn recommended() -> Self {
        Self(Self::RECOMMENDED.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_recommended(&self) -> bool {
        self.0 == Self::RECOMMENDED
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single car-for-sale record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub market_value: Option<f64>,
    /// Profit as reported by the valuation service. Prefer [`Listing::profit`].
    #[serde(default, rename = "profit")]
    pub reported_profit: Option<f64>,
    #[serde(default)]
    pub verdict: Option<Verdict>,
    #[serde(default)]
    pub region: Option<String>,
    /// Free-text location from the ad, e.g. `"Bratislava - Petržalka"`.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub km: Option<i64>,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub transmission: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub full_specs: Option<FullSpecs>,
}

impl Listing {
    /// Returns `market_value - price` when both are known, otherwise the
    /// server-reported profit.
    #[must_use]
    pub fn profit(&self) -> Option<f64> {
        match (self.market_value, self.price) {
            (Some(market), Some(price)) => Some(market - price),
            _ => self.reported_profit,
        }
    }

    #[must_use]
    pub fn is_recommended(&self) -> bool {
        self.verdict.as_ref().is_some_and(Verdict::is_recommended)
    }

    /// Parses `created_at`, treating offset-less timestamps as UTC.
    #[must_use]
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.created_at.as_deref()?)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Formats the age of `created` relative to `now` for card display.
///
/// Timestamps in the future (clock skew between scraper and viewer) render
/// as `"just now"`.
#[must_use]
pub fn relative_age(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} min ago")
    } else if elapsed.num_hours() < 24 {
        format!("{} h ago", elapsed.num_hours())
    } else {
        format!("{} d ago", elapsed.num_days())
    }
}

/// Nested specification blocks shown by the detail view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FullSpecs {
    #[serde(default)]
    pub basic_info: Option<serde_json::Value>,
    #[serde(default)]
    pub technical_details: Option<serde_json::Value>,
    #[serde(default)]
    pub condition: Option<serde_json::Value>,
    #[serde(default)]
    pub equipment: Option<serde_json::Value>,
}

/// Response body of `GET /api/carscraper/deals`.
///
/// The service also returns pagination fields (`page`, `pages`, ...) which
/// the feed ignores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingsPage {
    #[serde(default)]
    pub deals: Vec<Listing>,
    #[serde(default)]
    pub total: u64,
}

impl ListingsPage {
    #[must_use]
    pub fn from_listings(deals: Vec<Listing>) -> Self {
        let total = deals.len() as u64;
        Self { deals, total }
    }
}

/// Response body of `GET /api/carscraper/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub total_deals: u64,
    #[serde(default)]
    pub good_deals: u64,
    #[serde(default)]
    pub total_profit: f64,
    #[serde(default)]
    pub success_rate: f64,
}
