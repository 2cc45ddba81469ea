//! Filter flags shared by `watch` and `deals`.

use anyhow::bail;
use carfeed_core::{Catalog, Classification, FilterState, ListingId};
use clap::Args;

#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Only listings the service recommends buying
    #[arg(long, conflicts_with = "cheap")]
    pub recommended: bool,
    /// Only listings priced at or below 5000
    #[arg(long)]
    pub cheap: bool,
    /// Region id (e.g. BL) or name (e.g. "Bratislavský")
    #[arg(long)]
    pub region: Option<String>,
    /// Brand name, case-insensitive
    #[arg(long)]
    pub brand: Option<String>,
}

impl FilterArgs {
    /// Resolves the flags against `catalog`. Regions must be known; brands
    /// outside the catalog are passed through as typed.
    ///
    /// # Errors
    ///
    /// Returns an error if `--region` names no catalog region.
    pub fn resolve(&self, catalog: &Catalog) -> anyhow::Result<FilterState> {
        let classification = if self.recommended {
            Some(Classification::Recommended)
        } else if self.cheap {
            Some(Classification::PriceCapped)
        } else {
            None
        };
        let region = match self.region.as_deref() {
            Some(key) => Some(resolve_region(catalog, key)?),
            None => None,
        };
        let brand = self
            .brand
            .as_deref()
            .map(|b| catalog.find_brand(b).unwrap_or(b).to_owned());
        Ok(FilterState {
            classification,
            region,
            brand,
        })
    }
}

/// Maps a region id or name to the name listings carry.
///
/// # Errors
///
/// Returns an error if `key` matches no catalog region.
pub fn resolve_region(catalog: &Catalog, key: &str) -> anyhow::Result<String> {
    match catalog.find_region(key) {
        Some(entry) => Ok(entry.name.clone()),
        None => {
            let known: Vec<&str> = catalog.regions.iter().map(|r| r.id.as_str()).collect();
            bail!("unknown region '{key}' (known ids: {})", known.join(", "))
        }
    }
}

/// Listing ids are numeric on most backends; anything else is kept as text.
pub fn parse_listing_id(raw: &str) -> ListingId {
    raw.parse::<i64>()
        .map_or_else(|_| ListingId::Text(raw.to_owned()), ListingId::Int)
}
