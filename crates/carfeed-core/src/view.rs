//! Render states of the live feed.
//!
//! [`project`] turns the loading flag, the raw listing set and the active
//! filters into exactly one of three states. Display code matches on
//! [`FeedView`] and never inspects the raw set itself.

use std::fmt;

use crate::filter::{apply_filters, matches_region, FilterState};
use crate::listing::{FullSpecs, Listing, ListingId};

/// Number of skeleton cards shown while a poll is in flight.
pub const SKELETON_CARDS: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedView<'a> {
    Loading { placeholders: usize },
    Empty(EmptyReason),
    Grid(Vec<&'a Listing>),
}

/// Why the grid is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// The source returned no listings at all.
    NoListings,
    /// The selected region alone already excludes every listing.
    NoRegionMatch { region: String },
    /// Listings exist but the filter combination matches none of them.
    NoFilterMatch,
}

impl EmptyReason {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            EmptyReason::NoListings => {
                "No listings yet. Wait for the next scrape to finish.".to_string()
            }
            EmptyReason::NoRegionMatch { region } => {
                format!(
                    "No listings in {region} right now. \
                     Pick another region or clear the map filter."
                )
            }
            EmptyReason::NoFilterMatch => {
                "No listings match the current filters. Try changing or resetting them.".to_string()
            }
        }
    }

    /// Whether a "reset filters" action makes sense for this state.
    #[must_use]
    pub fn offers_reset(&self) -> bool {
        !matches!(self, EmptyReason::NoListings)
    }
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Projects the feed state into a render state.
///
/// Loading wins over everything else; otherwise the filtered set decides
/// between the empty state and the grid.
#[must_use]
pub fn project<'a>(loading: bool, listings: &'a [Listing], filter: &FilterState) -> FeedView<'a> {
    if loading {
        return FeedView::Loading {
            placeholders: SKELETON_CARDS,
        };
    }
    let visible = apply_filters(listings, filter);
    if !visible.is_empty() {
        return FeedView::Grid(visible);
    }
    FeedView::Empty(empty_reason(listings, filter))
}

fn empty_reason(listings: &[Listing], filter: &FilterState) -> EmptyReason {
    if listings.is_empty() {
        return EmptyReason::NoListings;
    }
    match filter.region.as_deref() {
        Some(region) if !listings.iter().any(|l| matches_region(l, region)) => {
            EmptyReason::NoRegionMatch {
                region: region.to_owned(),
            }
        }
        _ => EmptyReason::NoFilterMatch,
    }
}

/// Input of the detail view: a single listing, nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDetail {
    pub listing: Listing,
}

impl ListingDetail {
    /// Finds `id` in `listings` and builds its detail.
    #[must_use]
    pub fn open(listings: &[Listing], id: &ListingId) -> Option<Self> {
        listings
            .iter()
            .find(|l| &l.id == id)
            .map(|l| Self { listing: l.clone() })
    }

    /// Spec blocks, empty when the listing carries none.
    #[must_use]
    pub fn specs(&self) -> FullSpecs {
        self.listing.full_specs.clone().unwrap_or_default()
    }

    /// `(label, value)` rows for the basic spec table, preferring the nested
    /// `basic_info` block and falling back to top-level listing fields.
    #[must_use]
    pub fn basic_rows(&self) -> Vec<(&'static str, String)> {
        let basic = self.listing.full_specs.as_ref().and_then(|s| s.basic_info.as_ref());
        let from_basic = |key: &str| -> Option<String> {
            basic.and_then(|b| b.get(key)).and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
        };
        let l = &self.listing;
        let rows = [
            ("Brand", from_basic("brand").or_else(|| l.brand.clone())),
            ("Model", from_basic("model").or_else(|| l.model.clone())),
            (
                "Year",
                from_basic("year").or_else(|| l.year.map(|y| y.to_string())),
            ),
            (
                "Mileage (km)",
                from_basic("km").or_else(|| l.km.map(|k| k.to_string())),
            ),
            ("Fuel", from_basic("fuel_type").or_else(|| l.fuel_type.clone())),
            (
                "Transmission",
                from_basic("transmission").or_else(|| l.transmission.clone()),
            ),
        ];
        rows.into_iter()
            .filter_map(|(label, value)| value.map(|v| (label, v)))
            .collect()
    }
}
