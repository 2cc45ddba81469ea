use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Brands surfaced as selectable controls when no catalog file is configured.
pub const DEFAULT_BRANDS: [&str; 15] = [
    "Skoda",
    "Volkswagen",
    "Audi",
    "BMW",
    "Mercedes-Benz",
    "Hyundai",
    "Kia",
    "Toyota",
    "Peugeot",
    "Renault",
    "Ford",
    "Opel",
    "Dacia",
    "Fiat",
    "Seat",
];

const DEFAULT_REGIONS: [(&str, &str); 8] = [
    ("BL", "Bratislavský"),
    ("TT", "Trnavský"),
    ("TN", "Trenčiansky"),
    ("NR", "Nitriansky"),
    ("ZA", "Žilinský"),
    ("BB", "Banskobystrický"),
    ("PO", "Prešovský"),
    ("KE", "Košický"),
];

/// A region shown on the map: short id plus the name listings carry in
/// their `region` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEntry {
    pub id: String,
    pub name: String,
}

/// Candidate brands and map regions for the facet controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub brands: Vec<String>,
    pub regions: Vec<RegionEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            brands: DEFAULT_BRANDS.iter().map(|b| (*b).to_owned()).collect(),
            regions: DEFAULT_REGIONS
                .iter()
                .map(|(id, name)| RegionEntry {
                    id: (*id).to_owned(),
                    name: (*name).to_owned(),
                })
                .collect(),
        }
    }
}

impl Catalog {
    /// Resolves a region by short id (case-insensitive) or by exact name.
    #[must_use]
    pub fn find_region(&self, key: &str) -> Option<&RegionEntry> {
        self.regions
            .iter()
            .find(|r| r.id.eq_ignore_ascii_case(key) || r.name == key)
    }

    /// Resolves a brand to its catalog spelling (case-insensitive).
    #[must_use]
    pub fn find_brand(&self, key: &str) -> Option<&str> {
        let needle = key.to_lowercase();
        self.brands
            .iter()
            .find(|b| b.to_lowercase() == needle)
            .map(String::as_str)
    }
}

/// Load and validate a catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_catalog(&content)
}

/// Parse and validate catalog YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalog(content: &str) -> Result<Catalog, ConfigError> {
    let catalog: Catalog = serde_yaml::from_str(content)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn validate_catalog(catalog: &Catalog) -> Result<(), ConfigError> {
    let mut seen_brands = HashSet::new();
    for brand in &catalog.brands {
        if brand.trim().is_empty() {
            return Err(ConfigError::InvalidCatalog(
                "brand name must be non-empty".to_string(),
            ));
        }
        if !seen_brands.insert(brand.to_lowercase()) {
            return Err(ConfigError::InvalidCatalog(format!(
                "duplicate brand name: '{brand}'"
            )));
        }
    }

    let mut seen_ids = HashSet::new();
    for region in &catalog.regions {
        if region.id.trim().is_empty() || region.name.trim().is_empty() {
            return Err(ConfigError::InvalidCatalog(
                "region id and name must be non-empty".to_string(),
            ));
        }
        if !seen_ids.insert(region.id.to_uppercase()) {
            return Err(ConfigError::InvalidCatalog(format!(
                "duplicate region id: '{}'",
                region.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_valid() {
        let catalog = Catalog::default();
        assert_eq!(catalog.brands.len(), 15);
        assert_eq!(catalog.regions.len(), 8);
        validate_catalog(&catalog).unwrap();
    }

    #[test]
    fn find_region_by_id_or_name() {
        let catalog = Catalog::default();
        assert_eq!(catalog.find_region("ke").unwrap().name, "Košický");
        assert_eq!(catalog.find_region("Trnavský").unwrap().id, "TT");
        assert!(catalog.find_region("Moravský").is_none());
    }

    #[test]
    fn find_brand_returns_catalog_spelling() {
        let catalog = Catalog::default();
        assert_eq!(catalog.find_brand("mercedes-benz"), Some("Mercedes-Benz"));
        assert_eq!(catalog.find_brand("Lada"), None);
    }

    #[test]
    fn parse_catalog_reads_yaml() {
        let yaml = "brands: [Skoda, Tatra]\nregions:\n  - { id: BL, name: Bratislavský }\n";
        let catalog = parse_catalog(yaml).unwrap();
        assert_eq!(catalog.brands, vec!["Skoda", "Tatra"]);
        assert_eq!(catalog.regions[0].name, "Bratislavský");
    }

    #[test]
    fn validate_rejects_duplicate_brand_ignoring_case() {
        let err = parse_catalog("brands: [Skoda, SKODA]\nregions: []\n").unwrap_err();
        assert!(err.to_string().contains("duplicate brand name"));
    }

    #[test]
    fn validate_rejects_empty_brand() {
        let err = parse_catalog("brands: ['  ']\nregions: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCatalog(_)));
    }

    #[test]
    fn validate_rejects_duplicate_region_id() {
        let yaml = "brands: []\n\
                    regions:\n  - { id: KE, name: Košický }\n  - { id: ke, name: Košice }\n";
        let err = parse_catalog(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate region id"));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = parse_catalog("brands: {").unwrap_err();
        assert!(matches!(err, ConfigError::CatalogFileParse(_)));
    }

    #[test]
    fn load_catalog_reports_missing_file() {
        let err = load_catalog(Path::new("/nonexistent/carfeed/catalog.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::CatalogFileIo { .. }));
    }

    #[test]
    fn shipped_catalog_matches_defaults() {
        let catalog = parse_catalog(include_str!("../../../config/catalog.yaml")).unwrap();
        assert_eq!(catalog, Catalog::default());
    }
}
