//! Fixed demo dataset shown when the remote listing source is unavailable.
//!
//! Everything here is deterministic: the same call always returns the same
//! listings in the same order, so the fallback is independently testable.

use crate::listing::{Listing, ListingId, ListingsPage, StatsSnapshot, Verdict};

const NOT_RECOMMENDED: &str = "NEKUPOVAŤ";

struct SampleRow {
    id: i64,
    title: &'static str,
    brand: &'static str,
    price: f64,
    market_value: f64,
    verdict: &'static str,
    region: Option<&'static str>,
    location: &'static str,
    year: i32,
    km: i64,
    created_at: &'static str,
}

const SAMPLE_ROWS: &[SampleRow] = &[
    SampleRow {
        id: 1,
        title: "Škoda Octavia III 2.0 TDI Style",
        brand: "Skoda",
        price: 8500.0,
        market_value: 11200.0,
        verdict: Verdict::RECOMMENDED,
        region: Some("Bratislavský"),
        location: "Bratislava - Petržalka",
        year: 2016,
        km: 168_000,
        created_at: "2025-03-01T08:30:00",
    },
    SampleRow {
        id: 2,
        title: "Volkswagen Golf VII 1.6 TDI Comfortline",
        brand: "Volkswagen",
        price: 4700.0,
        market_value: 6100.0,
        verdict: Verdict::RECOMMENDED,
        region: None,
        location: "Košice, Košickom kraji",
        year: 2013,
        km: 212_000,
        created_at: "2025-03-01T07:55:00",
    },
    SampleRow {
        id: 3,
        title: "BMW 320d Touring xDrive",
        brand: "BMW",
        price: 12500.0,
        market_value: 11900.0,
        verdict: NOT_RECOMMENDED,
        region: Some("Žilinský"),
        location: "Martin",
        year: 2015,
        km: 195_000,
        created_at: "2025-03-01T06:10:00",
    },
    SampleRow {
        id: 4,
        title: "Hyundai i30 1.4 CVVT",
        brand: "Hyundai",
        price: 3900.0,
        market_value: 4200.0,
        verdict: NOT_RECOMMENDED,
        region: Some("Nitriansky"),
        location: "Nitra",
        year: 2010,
        km: 154_000,
        created_at: "2025-02-28T19:40:00",
    },
    SampleRow {
        id: 5,
        title: "Toyota Corolla 1.8 Hybrid Comfort",
        brand: "Toyota",
        price: 14900.0,
        market_value: 17300.0,
        verdict: Verdict::RECOMMENDED,
        region: Some("Trnavský"),
        location: "Trnava",
        year: 2019,
        km: 88_000,
        created_at: "2025-02-28T16:05:00",
    },
    SampleRow {
        id: 6,
        title: "Dacia Sandero 1.0 SCe Arctica",
        brand: "Dacia",
        price: 4950.0,
        market_value: 5600.0,
        verdict: Verdict::RECOMMENDED,
        region: Some("Prešovský"),
        location: "Prešov",
        year: 2017,
        km: 97_000,
        created_at: "2025-02-28T11:20:00",
    },
];

fn build(row: &SampleRow) -> Listing {
    let profit = row.market_value - row.price;
    let recommended = row.verdict == Verdict::RECOMMENDED;
    Listing {
        id: ListingId::Int(row.id),
        title: row.title.to_owned(),
        price: Some(row.price),
        market_value: Some(row.market_value),
        reported_profit: Some(profit),
        verdict: Some(Verdict::new(row.verdict)),
        region: row.region.map(str::to_owned),
        location: Some(row.location.to_owned()),
        brand: Some(row.brand.to_owned()),
        model: None,
        year: Some(row.year),
        km: Some(row.km),
        fuel_type: None,
        transmission: None,
        score: None,
        risk_level: Some(if recommended { "Nízke" } else { "Vysoké" }.to_owned()),
        reason: None,
        source: Some("Bazoš.sk".to_owned()),
        link: None,
        image_url: None,
        description: None,
        created_at: Some(row.created_at.to_owned()),
        full_specs: None,
    }
}

/// The complete demo listing set.
#[must_use]
pub fn sample_listings() -> Vec<Listing> {
    SAMPLE_ROWS.iter().map(build).collect()
}

/// The demo set restricted to `verdict` when one is requested, with `total`
/// equal to the number of returned listings.
#[must_use]
pub fn sample_page(verdict: Option<&Verdict>) -> ListingsPage {
    let deals = sample_listings()
        .into_iter()
        .filter(|l| verdict.is_none_or(|v| l.verdict.as_ref() == Some(v)))
        .collect();
    ListingsPage::from_listings(deals)
}

/// Summary statistics derived from the demo set.
#[must_use]
pub fn sample_stats() -> StatsSnapshot {
    let listings = sample_listings();
    let total = listings.len() as u64;
    let good = listings.iter().filter(|l| l.is_recommended()).count() as u64;
    let total_profit = listings
        .iter()
        .filter_map(Listing::profit)
        .filter(|p| *p > 0.0)
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let success_rate = if total == 0 {
        0.0
    } else {
        (good as f64 / total as f64 * 1000.0).round() / 10.0
    };
    StatsSnapshot {
        total_deals: total,
        good_deals: good,
        total_profit,
        success_rate,
    }
}

/// Demo listings for the featured panel.
#[must_use]
pub fn sample_featured() -> Vec<Listing> {
    [1_usize, 5, 3]
        .iter()
        .map(|&idx| {
            let mut listing = build(&SAMPLE_ROWS[idx - 1]);
            listing.id = ListingId::Text(format!("demo-{idx}"));
            listing
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_ids_are_unique() {
        let listings = sample_listings();
        let mut ids: Vec<_> = listings.iter().map(|l| l.id.to_string()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), listings.len());
    }

    #[test]
    fn sample_page_restricts_to_verdict() {
        let page = sample_page(Some(&Verdict::recommended()));
        assert_eq!(page.deals.len(), 4);
        assert_eq!(page.total, 4);
        assert!(page.deals.iter().all(Listing::is_recommended));
    }

    #[test]
    fn sample_page_without_verdict_is_full_set() {
        let page = sample_page(None);
        assert_eq!(page.deals.len(), sample_listings().len());
        assert_eq!(page.total, page.deals.len() as u64);
    }

    #[test]
    fn unknown_verdict_yields_empty_page() {
        let page = sample_page(Some(&Verdict::new("SUPER_DEAL")));
        assert!(page.deals.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn sample_stats_match_dataset() {
        let stats = sample_stats();
        assert_eq!(stats.total_deals, 6);
        assert_eq!(stats.good_deals, 4);
        // 2700 + 1400 + 300 + 2400 + 650; the BMW loss is excluded.
        assert!((stats.total_profit - 7450.0).abs() < 1e-6);
        assert!((stats.success_rate - 66.7).abs() < 1e-6);
    }

    #[test]
    fn featured_demo_has_three_text_ids() {
        let featured = sample_featured();
        assert_eq!(featured.len(), 3);
        assert_eq!(featured[0].id, ListingId::Text("demo-1".to_string()));
    }
}
