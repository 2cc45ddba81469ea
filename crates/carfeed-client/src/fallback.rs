//! What to show when the listing source is unavailable.

use carfeed_core::sample::{sample_featured, sample_page, sample_stats};
use carfeed_core::{FallbackMode, Listing, ListingsPage, StatsSnapshot, Verdict};
use serde::Serialize;

use crate::source::{ListingSource, Sourced};

/// Where a piece of displayed data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedOrigin {
    Live,
    Sample,
    Empty,
}

impl FeedOrigin {
    #[must_use]
    pub fn is_live(self) -> bool {
        self == FeedOrigin::Live
    }
}

/// Data paired with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub data: T,
    pub origin: FeedOrigin,
}

impl<T> Resolved<T> {
    fn live(data: T) -> Self {
        Self {
            data,
            origin: FeedOrigin::Live,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Substitute the demo dataset.
    #[default]
    SampleData,
    /// Substitute empty data.
    Empty,
}

impl From<FallbackMode> for FallbackPolicy {
    fn from(mode: FallbackMode) -> Self {
        match mode {
            FallbackMode::Sample => FallbackPolicy::SampleData,
            FallbackMode::Empty => FallbackPolicy::Empty,
        }
    }
}

impl FallbackPolicy {
    /// Resolves a listings outcome. Substituted sample data honours the
    /// requested verdict so a "recommended" view never shows rejected demo
    /// listings.
    #[must_use]
    pub fn resolve_listings(
        self,
        outcome: Sourced<ListingsPage>,
        verdict: Option<&Verdict>,
    ) -> Resolved<ListingsPage> {
        match outcome {
            Sourced::Live(page) => Resolved::live(page),
            Sourced::Unavailable(reason) => {
                tracing::warn!(%reason, policy = ?self, "feed: listing source unavailable");
                match self {
                    FallbackPolicy::SampleData => Resolved {
                        data: sample_page(verdict),
                        origin: FeedOrigin::Sample,
                    },
                    FallbackPolicy::Empty => Resolved {
                        data: ListingsPage::default(),
                        origin: FeedOrigin::Empty,
                    },
                }
            }
        }
    }

    #[must_use]
    pub fn resolve_stats(self, outcome: Sourced<StatsSnapshot>) -> Resolved<StatsSnapshot> {
        match outcome {
            Sourced::Live(stats) => Resolved::live(stats),
            Sourced::Unavailable(reason) => {
                tracing::warn!(%reason, policy = ?self, "feed: stats source unavailable");
                match self {
                    FallbackPolicy::SampleData => Resolved {
                        data: sample_stats(),
                        origin: FeedOrigin::Sample,
                    },
                    FallbackPolicy::Empty => Resolved {
                        data: StatsSnapshot::default(),
                        origin: FeedOrigin::Empty,
                    },
                }
            }
        }
    }

    /// Resolves the featured panel. An empty live list is treated like an
    /// unavailable source: the panel is never left blank under
    /// [`FallbackPolicy::SampleData`].
    #[must_use]
    pub fn resolve_featured(self, outcome: Sourced<Vec<Listing>>) -> Resolved<Vec<Listing>> {
        match outcome {
            Sourced::Live(listings) if !listings.is_empty() => Resolved::live(listings),
            Sourced::Live(_) => self.substitute_featured(),
            Sourced::Unavailable(reason) => {
                tracing::warn!(%reason, policy = ?self, "feed: featured source unavailable");
                self.substitute_featured()
            }
        }
    }

    fn substitute_featured(self) -> Resolved<Vec<Listing>> {
        match self {
            FallbackPolicy::SampleData => Resolved {
                data: sample_featured(),
                origin: FeedOrigin::Sample,
            },
            FallbackPolicy::Empty => Resolved {
                data: Vec::new(),
                origin: FeedOrigin::Empty,
            },
        }
    }
}

/// Fetches listings from `source` and applies `policy`.
pub async fn load_listings<S: ListingSource + ?Sized>(
    source: &S,
    policy: FallbackPolicy,
    verdict: Option<&Verdict>,
) -> Resolved<ListingsPage> {
    policy.resolve_listings(source.listings(verdict).await, verdict)
}

pub async fn load_stats<S: ListingSource + ?Sized>(
    source: &S,
    policy: FallbackPolicy,
) -> Resolved<StatsSnapshot> {
    policy.resolve_stats(source.stats().await)
}

pub async fn load_featured<S: ListingSource + ?Sized>(
    source: &S,
    policy: FallbackPolicy,
) -> Resolved<Vec<Listing>> {
    policy.resolve_featured(source.featured().await)
}

#[cfg(test)]
mod tests {
    use carfeed_core::ListingId;

    use super::*;
    use crate::source::Unavailable;

    fn down<T>() -> Sourced<T> {
        Sourced::Unavailable(Unavailable::Status(503))
    }

    #[test]
    fn live_listings_pass_through() {
        let page = ListingsPage::from_listings(Vec::new());
        let resolved =
            FallbackPolicy::SampleData.resolve_listings(Sourced::Live(page.clone()), None);
        assert_eq!(resolved.origin, FeedOrigin::Live);
        assert_eq!(resolved.data, page);
    }

    #[test]
    fn sample_fallback_is_restricted_to_requested_verdict() {
        let verdict = Verdict::recommended();
        let resolved = FallbackPolicy::SampleData.resolve_listings(down(), Some(&verdict));
        assert_eq!(resolved.origin, FeedOrigin::Sample);
        assert!(!resolved.data.deals.is_empty());
        assert!(resolved.data.deals.iter().all(Listing::is_recommended));
        assert_eq!(resolved.data.total, resolved.data.deals.len() as u64);
    }

    #[test]
    fn sample_fallback_without_verdict_returns_full_set() {
        let resolved = FallbackPolicy::SampleData.resolve_listings(down(), None);
        assert_eq!(resolved.data.deals.len(), 6);
        assert_eq!(resolved.data.total, 6);
    }

    #[test]
    fn empty_policy_substitutes_nothing() {
        let listings = FallbackPolicy::Empty.resolve_listings(down(), None);
        assert_eq!(listings.origin, FeedOrigin::Empty);
        assert!(listings.data.deals.is_empty());
        assert_eq!(listings.data.total, 0);

        let stats = FallbackPolicy::Empty.resolve_stats(down());
        assert_eq!(stats.data, StatsSnapshot::default());
    }

    #[test]
    fn stats_fall_back_to_sample_summary() {
        let resolved = FallbackPolicy::SampleData.resolve_stats(down());
        assert_eq!(resolved.origin, FeedOrigin::Sample);
        assert_eq!(resolved.data.total_deals, 6);
        assert_eq!(resolved.data.good_deals, 4);
    }

    #[test]
    fn empty_live_featured_list_is_replaced() {
        let resolved = FallbackPolicy::SampleData.resolve_featured(Sourced::Live(Vec::new()));
        assert_eq!(resolved.origin, FeedOrigin::Sample);
        assert_eq!(resolved.data.len(), 3);
        assert_eq!(resolved.data[0].id, ListingId::Text("demo-1".to_string()));
    }

    #[test]
    fn fallback_mode_maps_to_policy() {
        assert_eq!(FallbackPolicy::from(FallbackMode::Sample), FallbackPolicy::SampleData);
        assert_eq!(FallbackPolicy::from(FallbackMode::Empty), FallbackPolicy::Empty);
    }
}
