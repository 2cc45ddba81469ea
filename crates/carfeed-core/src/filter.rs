//! Client-side filter engine for the live feed.
//!
//! Dimensions are independent and combine with AND. Predicates run in a fixed
//! order (classification, region, brand); they commute, the order only keeps
//! evaluation deterministic.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::listing::{Listing, Verdict};

/// Inclusive price ceiling for the [`Classification::PriceCapped`] filter.
pub const PRICE_CAP: f64 = 5000.0;

/// Classification dimension of the filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Only listings whose verdict is [`Verdict::RECOMMENDED`].
    Recommended,
    /// Only listings priced at or below [`PRICE_CAP`].
    PriceCapped,
}

impl Classification {
    /// The verdict forwarded to the remote query for this classification.
    ///
    /// Only the recommended filter is evaluated server-side; the price cap is
    /// always applied locally.
    #[must_use]
    pub fn remote_verdict(self) -> Option<Verdict> {
        match self {
            Classification::Recommended => Some(Verdict::recommended()),
            Classification::PriceCapped => None,
        }
    }

    fn matches(self, listing: &Listing) -> bool {
        match self {
            Classification::Recommended => listing.is_recommended(),
            Classification::PriceCapped => listing.price.is_some_and(|p| p <= PRICE_CAP),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Recommended => write!(f, "recommended"),
            Classification::PriceCapped => write!(f, "price-capped"),
        }
    }
}

/// The active filter selection. `None` on a dimension means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub classification: Option<Classification>,
    pub region: Option<String>,
    pub brand: Option<String>,
}

impl FilterState {
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.classification.is_none() && self.region.is_none() && self.brand.is_none()
    }

    /// Clears every dimension.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Selects `brand`, or clears the brand dimension when it is already the
    /// active selection (case-insensitive).
    pub fn toggle_brand(&mut self, brand: &str) {
        let same = self
            .brand
            .as_deref()
            .is_some_and(|current| current.to_lowercase() == brand.to_lowercase());
        self.brand = if same { None } else { Some(brand.to_owned()) };
    }

    /// Selects `region`, or clears the region dimension when it is already
    /// the active selection.
    pub fn toggle_region(&mut self, region: &str) {
        let same = self.region.as_deref() == Some(region);
        self.region = if same { None } else { Some(region.to_owned()) };
    }

    /// The verdict to forward to the remote query, if any.
    #[must_use]
    pub fn remote_verdict(&self) -> Option<Verdict> {
        self.classification.and_then(Classification::remote_verdict)
    }
}

/// Returns the listings that pass every active dimension of `filter`.
///
/// Pure: the input slice is only borrowed and the output preserves its order.
#[must_use]
pub fn apply_filters<'a>(listings: &'a [Listing], filter: &FilterState) -> Vec<&'a Listing> {
    listings
        .iter()
        .filter(|l| filter.classification.is_none_or(|c| c.matches(l)))
        .filter(|l| filter.region.as_deref().is_none_or(|r| matches_region(l, r)))
        .filter(|l| filter.brand.as_deref().is_none_or(|b| matches_brand(l, b)))
        .collect()
}

/// Region predicate: exact match on `region`, or a lenient substring match on
/// the free-text `location` when the listing carries no region.
#[must_use]
pub fn matches_region(listing: &Listing, region: &str) -> bool {
    if let Some(own) = listing.region.as_deref() {
        return own == region;
    }
    let Some(location) = listing.location.as_deref() else {
        return false;
    };
    let needle = strip_adjective_accent(region).to_lowercase();
    !needle.is_empty() && location.to_lowercase().contains(&needle)
}

/// Brand predicate: case-insensitive equality. Listings without a brand never
/// match.
#[must_use]
pub fn matches_brand(listing: &Listing, brand: &str) -> bool {
    listing
        .brand
        .as_deref()
        .is_some_and(|own| own.to_lowercase() == brand.to_lowercase())
}

/// Drops the first `ý` from a region name so that the adjective stem matches
/// declined forms in ad text ("Košický" → "Košick", found in "Košickom kraji").
fn strip_adjective_accent(region: &str) -> String {
    match region.char_indices().find(|&(_, c)| c == 'ý') {
        Some((idx, c)) => {
            let mut out = String::with_capacity(region.len());
            out.push_str(&region[..idx]);
            out.push_str(&region[idx + c.len_utf8()..]);
            out
        }
        None => region.to_owned(),
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
