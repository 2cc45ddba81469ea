//! Facet counts for the brand bar and the region map.
//!
//! Counts are always taken over the full, unfiltered listing set so a badge
//! shows how many listings exist for that facet regardless of the current
//! selection.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::listing::Listing;

/// Count of listings for one candidate brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandFacet {
    /// Brand label as spelled in the candidate list.
    pub brand: String,
    pub count: usize,
}

impl BrandFacet {
    /// A brand with no listings is shown but cannot be selected.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.count > 0
    }
}

/// Counts per candidate brand, in candidate order.
///
/// Matching is case-insensitive. Candidates that differ only by case are
/// collapsed onto their first spelling so no listing is counted twice.
#[must_use]
pub fn count_by_brand<S: AsRef<str>>(listings: &[Listing], candidates: &[S]) -> Vec<BrandFacet> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .map(AsRef::as_ref)
        .filter(|brand| seen.insert(brand.to_lowercase()))
        .map(|brand| {
            let needle = brand.to_lowercase();
            let count = listings
                .iter()
                .filter(|l| l.brand.as_deref().is_some_and(|b| b.to_lowercase() == needle))
                .count();
            BrandFacet {
                brand: brand.to_owned(),
                count,
            }
        })
        .collect()
}

/// Counts per exact `region` value. Listings without a region are skipped;
/// the free-text location fallback used by the filter does not apply here.
#[must_use]
pub fn count_by_region(listings: &[Listing]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for region in listings.iter().filter_map(|l| l.region.as_deref()) {
        *counts.entry(region.to_owned()).or_insert(0) += 1;
    }
    counts
}

/// All facet counts for one raw listing set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetCounts {
    /// Size of the raw set; shown on the "all brands" control.
    pub all: usize,
    pub brands: Vec<BrandFacet>,
    pub regions: BTreeMap<String, usize>,
}

impl FacetCounts {
    #[must_use]
    pub fn compute<S: AsRef<str>>(listings: &[Listing], candidate_brands: &[S]) -> Self {
        Self {
            all: listings.len(),
            brands: count_by_brand(listings, candidate_brands),
            regions: count_by_region(listings),
        }
    }

    /// Count for `brand` (case-insensitive), or zero when it is not a candidate.
    #[must_use]
    pub fn brand_count(&self, brand: &str) -> usize {
        let needle = brand.to_lowercase();
        self.brands
            .iter()
            .find(|f| f.brand.to_lowercase() == needle)
            .map_or(0, |f| f.count)
    }

    #[must_use]
    pub fn region_count(&self, region: &str) -> usize {
        self.regions.get(region).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ListingId;
    use crate::sample;

    fn bare(id: i64, brand: Option<&str>, region: Option<&str>) -> Listing {
        let mut l = sample::sample_listings()[0].clone();
        l.id = ListingId::Int(id);
        l.brand = brand.map(str::to_owned);
        l.region = region.map(str::to_owned);
        l.location = Some("Bratislava".to_string());
        l
    }

    #[test]
    fn brand_counts_are_case_insensitive_and_ordered() {
        let listings = vec![
            bare(1, Some("skoda"), None),
            bare(2, Some("SKODA"), None),
            bare(3, Some("BMW"), None),
        ];
        let facets = count_by_brand(&listings, &["BMW", "Skoda", "Audi"]);
        assert_eq!(
            facets,
            vec![
                BrandFacet { brand: "BMW".into(), count: 1 },
                BrandFacet { brand: "Skoda".into(), count: 2 },
                BrandFacet { brand: "Audi".into(), count: 0 },
            ]
        );
        assert!(!facets[2].is_selectable());
    }

    #[test]
    fn brand_sum_never_exceeds_listing_count() {
        let listings = vec![
            bare(1, Some("Skoda"), None),
            bare(2, Some("Lada"), None),
            bare(3, None, None),
        ];
        let facets = count_by_brand(&listings, &["Skoda", "skoda", "BMW"]);
        let sum: usize = facets.iter().map(|f| f.count).sum();
        assert_eq!(facets.len(), 2, "duplicate candidate must collapse");
        assert!(sum < listings.len());

        let covered = vec![bare(1, Some("Skoda"), None), bare(2, Some("bmw"), None)];
        let sum: usize = count_by_brand(&covered, &["Skoda", "BMW"])
            .iter()
            .map(|f| f.count)
            .sum();
        assert_eq!(sum, covered.len());
    }

    #[test]
    fn region_counts_ignore_location_text() {
        let listings = vec![
            bare(1, None, Some("Košický")),
            bare(2, None, Some("Košický")),
            bare(3, None, None),
        ];
        let counts = count_by_region(&listings);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts["Košický"], 2);
    }

    #[test]
    fn facet_lookups_are_case_insensitive_and_default_to_zero() {
        let listings = sample::sample_listings();
        let counts = FacetCounts::compute(&listings, &["Skoda", "BMW", "Volkswagen"]);

        assert_eq!(counts.all, listings.len());
        assert_eq!(counts.brand_count("skoda"), 1);
        assert_eq!(counts.brand_count("SKODA"), 1);
        assert_eq!(counts.brand_count("Lada"), 0);
        assert_eq!(counts.region_count("Bratislavský"), 1);
        assert_eq!(counts.region_count("Atlantis"), 0);
    }
}
