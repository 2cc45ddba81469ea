//! Plain-text rendering of feed data.
//!
//! Every function returns a `String` so output can be asserted in tests;
//! callers decide where it is printed.

use std::fmt::Write as _;

use carfeed_client::{FeedOrigin, FeedState};
use carfeed_core::{
    relative_age, Catalog, FacetCounts, FeedView, Listing, ListingDetail, StatsSnapshot, Theme,
};
use chrono::{DateTime, Utc};

/// The featured panel never shows more than this many listings.
pub const FEATURED_LIMIT: usize = 3;

const MISSING: &str = "\u{2014}";
const PLACEHOLDER_ROW: &str =
    "  \u{2591}\u{2591}\u{2591}\u{2591}\u{2591}\u{2591}\u{2591}\u{2591}\n";

pub fn origin_banner(origin: FeedOrigin) -> String {
    match origin {
        FeedOrigin::Live => String::new(),
        FeedOrigin::Sample => "[demo data: deals service unavailable]\n".to_string(),
        FeedOrigin::Empty => "[deals service unavailable]\n".to_string(),
    }
}

fn fmt_price(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.0} €"))
}

fn fmt_opt(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING)
}

fn fmt_age(listing: &Listing, now: DateTime<Utc>) -> String {
    listing
        .created_at_utc()
        .map_or_else(|| MISSING.to_string(), |created| relative_age(created, now))
}

pub fn render_table(listings: &[&Listing], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10}{:<40}{:>10}{:>10}  {:<12}{:<18}AGE",
        "ID", "TITLE", "PRICE", "PROFIT", "VERDICT", "REGION"
    );
    for listing in listings {
        let region = listing
            .region
            .as_deref()
            .or(listing.location.as_deref());
        let _ = writeln!(
            out,
            "{:<10}{:<40}{:>10}{:>10}  {:<12}{:<18}{}",
            listing.id.to_string(),
            truncate(&listing.title, 38),
            fmt_price(listing.price),
            fmt_price(listing.profit()),
            fmt_opt(listing.verdict.as_ref().map(carfeed_core::Verdict::as_str)),
            truncate(fmt_opt(region), 16),
            fmt_age(listing, now),
        );
    }
    out
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(max.saturating_sub(1)).collect();
    cut.push('\u{2026}');
    cut
}

pub fn render_view(view: &FeedView<'_>, now: DateTime<Utc>) -> String {
    match view {
        FeedView::Loading { placeholders } => {
            let mut out = String::from("loading listings...\n");
            for _ in 0..*placeholders {
                out.push_str(PLACEHOLDER_ROW);
            }
            out
        }
        FeedView::Empty(reason) => {
            let mut out = format!("{reason}\n");
            if reason.offers_reset() {
                out.push_str("type `reset` to clear all filters\n");
            }
            out
        }
        FeedView::Grid(listings) => render_table(listings, now),
    }
}

/// One status line above the feed: filters, theme and freshness.
pub fn render_header(state: &FeedState, theme: Theme, now: DateTime<Utc>) -> String {
    let filter = &state.filter;
    let mut parts = Vec::new();
    if let Some(classification) = filter.classification {
        parts.push(classification.to_string());
    }
    if let Some(region) = &filter.region {
        parts.push(format!("region {region}"));
    }
    if let Some(brand) = &filter.brand {
        parts.push(format!("brand {brand}"));
    }
    let filters = if parts.is_empty() {
        "all listings".to_string()
    } else {
        parts.join(", ")
    };
    let updated = state
        .last_updated
        .map_or_else(|| "never".to_string(), |at| relative_age(at, now));

    let mut out = format!(
        "carfeed | {filters} | {} raw | updated {updated} | theme {theme}\n",
        state.listings.len()
    );
    if let Some(origin) = state.origin {
        out.push_str(&origin_banner(origin));
    }
    out
}

pub fn render_stats(stats: &StatsSnapshot) -> String {
    format!(
        "total deals:   {}\ngood deals:    {}\ntotal profit:  {:.0} €\nsuccess rate:  {:.1} %\n",
        stats.total_deals, stats.good_deals, stats.total_profit, stats.success_rate
    )
}

pub fn render_featured(listings: &[Listing]) -> String {
    if listings.is_empty() {
        return "no featured deals\n".to_string();
    }
    let mut out = String::new();
    for (rank, listing) in listings.iter().take(FEATURED_LIMIT).enumerate() {
        let _ = writeln!(
            out,
            "{}. {} | {} | profit {}",
            rank + 1,
            listing.title,
            fmt_price(listing.price),
            fmt_price(listing.profit()),
        );
    }
    out
}

/// Brand counts in catalog order, then region counts in map order. Brands
/// with no listings are marked as not selectable.
pub fn render_facets(counts: &FacetCounts, catalog: &Catalog) -> String {
    let mut out = format!("{:<18}{:>5}\n", "All", counts.all);
    for facet in &counts.brands {
        let marker = if facet.is_selectable() { "" } else { "  (none)" };
        let _ = writeln!(out, "{:<18}{:>5}{marker}", facet.brand, facet.count);
    }
    out.push('\n');
    for region in &catalog.regions {
        let _ = writeln!(
            out,
            "{:<4}{:<16}{:>5}",
            region.id,
            region.name,
            counts.region_count(&region.name)
        );
    }
    out
}

pub fn render_detail(detail: &ListingDetail) -> String {
    let listing = &detail.listing;
    let mut out = format!("{}\n", listing.title);
    let _ = writeln!(
        out,
        "price {} | market value {} | profit {}",
        fmt_price(listing.price),
        fmt_price(listing.market_value),
        fmt_price(listing.profit())
    );
    for (label, value) in detail.basic_rows() {
        let _ = writeln!(out, "  {label:<14}{value}");
    }

    let specs = detail.specs();
    for (title, block) in [
        ("Technical", specs.technical_details.as_ref()),
        ("Condition", specs.condition.as_ref()),
        ("Equipment", specs.equipment.as_ref()),
    ] {
        let Some(serde_json::Value::Object(fields)) = block else {
            continue;
        };
        let _ = writeln!(out, "{title}:");
        for (key, value) in fields {
            let shown = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let _ = writeln!(out, "  {key:<14}{shown}");
        }
    }

    if let Some(reason) = &listing.reason {
        let _ = writeln!(out, "reason: {reason}");
    }
    if let Some(link) = &listing.link {
        let _ = writeln!(out, "{link}");
    }
    out
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
