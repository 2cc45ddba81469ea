pub mod app_config;
pub mod catalog;
pub mod config;
pub mod facets;
pub mod filter;
pub mod listing;
pub mod sample;
pub mod theme;
pub mod view;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, FallbackMode};
pub use catalog::{load_catalog, Catalog, RegionEntry};
pub use config::{load_app_config, load_app_config_from_env};
pub use facets::{count_by_brand, count_by_region, BrandFacet, FacetCounts};
pub use filter::{apply_filters, Classification, FilterState, PRICE_CAP};
pub use listing::{
    relative_age, FullSpecs, Listing, ListingId, ListingsPage, StatsSnapshot, Verdict,
};
pub use theme::{
    terminal_prefers_dark, FileThemeStore, Theme, ThemeContext, ThemeError, ThemeStore,
};
pub use view::{project, EmptyReason, FeedView, ListingDetail};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    InvalidCatalog(String),
}
