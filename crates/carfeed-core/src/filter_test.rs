use super::*;
use crate::listing::ListingId;

fn listing(id: i64, price: Option<f64>, verdict: &str) -> Listing {
    Listing {
        id: ListingId::Int(id),
        title: format!("listing {id}"),
        price,
        market_value: None,
        reported_profit: None,
        verdict: Some(Verdict::new(verdict)),
        region: None,
        location: None,
        brand: None,
        model: None,
        year: None,
        km: None,
        fuel_type: None,
        transmission: None,
        score: None,
        risk_level: None,
        reason: None,
        source: None,
        link: None,
        image_url: None,
        description: None,
        created_at: None,
        full_specs: None,
    }
}

fn with_brand(mut l: Listing, brand: &str) -> Listing {
    l.brand = Some(brand.to_string());
    l
}

fn with_region(mut l: Listing, region: &str) -> Listing {
    l.region = Some(region.to_string());
    l
}

fn with_location(mut l: Listing, location: &str) -> Listing {
    l.location = Some(location.to_string());
    l
}

fn three_listings() -> Vec<Listing> {
    vec![
        listing(1, Some(4000.0), Verdict::RECOMMENDED),
        listing(2, Some(9000.0), Verdict::RECOMMENDED),
        listing(3, Some(3000.0), "NEKUPOVAŤ"),
    ]
}

fn prices(listings: &[&Listing]) -> Vec<f64> {
    listings.iter().filter_map(|l| l.price).collect()
}

fn all_filter_states() -> Vec<FilterState> {
    let classifications = [
        None,
        Some(Classification::Recommended),
        Some(Classification::PriceCapped),
    ];
    let regions = [None, Some("Košický".to_string()), Some("Nitriansky".to_string())];
    let brands = [None, Some("skoda".to_string()), Some("BMW".to_string())];

    let mut out = Vec::new();
    for classification in classifications {
        for region in &regions {
            for brand in &brands {
                out.push(FilterState {
                    classification,
                    region: region.clone(),
                    brand: brand.clone(),
                });
            }
        }
    }
    out
}

fn mixed_listings() -> Vec<Listing> {
    let skoda = with_brand(listing(1, Some(4000.0), Verdict::RECOMMENDED), "Skoda");
    let bmw = with_brand(listing(2, Some(7500.0), "NEKUPOVAŤ"), "BMW");
    vec![
        with_region(skoda, "Košický"),
        with_location(bmw, "Košice, Košickom kraji"),
        with_region(listing(3, None, Verdict::RECOMMENDED), "Nitriansky"),
        with_brand(listing(4, Some(5000.0), "OK"), "SKODA"),
    ]
}

#[test]
fn unfiltered_state_keeps_everything() {
    let listings = three_listings();
    let out = apply_filters(&listings, &FilterState::default());
    assert_eq!(out.len(), 3);
}

#[test]
fn recommended_keeps_only_recommended_verdicts() {
    let listings = three_listings();
    let filter = FilterState {
        classification: Some(Classification::Recommended),
        ..FilterState::default()
    };
    assert_eq!(prices(&apply_filters(&listings, &filter)), vec![4000.0, 9000.0]);
}

#[test]
fn price_capped_keeps_listings_at_or_below_cap() {
    let listings = three_listings();
    let filter = FilterState {
        classification: Some(Classification::PriceCapped),
        ..FilterState::default()
    };
    assert_eq!(prices(&apply_filters(&listings, &filter)), vec![4000.0, 3000.0]);
}

#[test]
fn price_cap_is_inclusive_and_excludes_missing_price() {
    let listings = vec![
        listing(1, Some(PRICE_CAP), "OK"),
        listing(2, None, "OK"),
        listing(3, Some(PRICE_CAP + 0.01), "OK"),
    ];
    let filter = FilterState {
        classification: Some(Classification::PriceCapped),
        ..FilterState::default()
    };
    let out = apply_filters(&listings, &filter);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, ListingId::Int(1));
}

#[test]
fn brand_matches_case_insensitively() {
    let listings = mixed_listings();
    let filter = FilterState {
        brand: Some("skoda".to_string()),
        ..FilterState::default()
    };
    let ids: Vec<_> = apply_filters(&listings, &filter)
        .iter()
        .map(|l| l.id.clone())
        .collect();
    assert_eq!(ids, vec![ListingId::Int(1), ListingId::Int(4)]);
}

#[test]
fn brand_without_matches_yields_empty() {
    let listings = three_listings();
    let filter = FilterState {
        brand: Some("BMW".to_string()),
        ..FilterState::default()
    };
    assert!(apply_filters(&listings, &filter).is_empty());
}

#[test]
fn region_uses_exact_match_then_location_fallback() {
    let listings = mixed_listings();
    let filter = FilterState {
        region: Some("Košický".to_string()),
        ..FilterState::default()
    };
    let ids: Vec<_> = apply_filters(&listings, &filter)
        .iter()
        .map(|l| l.id.clone())
        .collect();
    // 1 by exact region, 2 by location text; 3 has a different region and
    // 4 has neither field.
    assert_eq!(ids, vec![ListingId::Int(1), ListingId::Int(2)]);
}

#[test]
fn region_field_takes_precedence_over_location() {
    let l = with_location(with_region(listing(1, Some(1.0), "OK"), "Žilinský"), "Košice");
    assert!(!matches_region(&l, "Košický"));
    assert!(matches_region(&l, "Žilinský"));
}

#[test]
fn dimensions_combine_with_and() {
    let listings = mixed_listings();
    let filter = FilterState {
        classification: Some(Classification::Recommended),
        region: Some("Košický".to_string()),
        brand: Some("Skoda".to_string()),
    };
    let out = apply_filters(&listings, &filter);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, ListingId::Int(1));
}

#[test]
fn apply_filters_is_idempotent() {
    let listings = mixed_listings();
    for filter in all_filter_states() {
        let once: Vec<Listing> = apply_filters(&listings, &filter)
            .into_iter()
            .cloned()
            .collect();
        let twice = apply_filters(&once, &filter);
        assert_eq!(twice.len(), once.len(), "not idempotent for {filter:?}");
        assert!(
            twice.iter().zip(once.iter()).all(|(a, b)| a.id == b.id),
            "order changed for {filter:?}"
        );
    }
}

#[test]
fn strip_adjective_accent_removes_first_occurrence_only() {
    assert_eq!(strip_adjective_accent("Košický"), "Košick");
    assert_eq!(strip_adjective_accent("ýý"), "ý");
    assert_eq!(strip_adjective_accent("Bratislava"), "Bratislava");
}

#[test]
fn toggle_brand_clears_active_selection() {
    let mut filter = FilterState::default();
    filter.toggle_brand("Audi");
    assert_eq!(filter.brand.as_deref(), Some("Audi"));
    filter.toggle_brand("audi");
    assert!(filter.brand.is_none());
}

#[test]
fn toggle_region_and_reset() {
    let mut filter = FilterState {
        classification: Some(Classification::PriceCapped),
        ..FilterState::default()
    };
    filter.toggle_region("Trnavský");
    assert_eq!(filter.region.as_deref(), Some("Trnavský"));
    filter.toggle_region("Trnavský");
    assert!(filter.region.is_none());
    filter.reset();
    assert!(filter.is_unfiltered());
}

#[test]
fn only_recommended_is_forwarded_remotely() {
    let mut filter = FilterState::default();
    assert!(filter.remote_verdict().is_none());
    filter.classification = Some(Classification::PriceCapped);
    assert!(filter.remote_verdict().is_none());
    filter.classification = Some(Classification::Recommended);
    assert_eq!(filter.remote_verdict(), Some(Verdict::recommended()));
}
