use std::path::Path;
use thiserror::Error;

use crate::core::{
    distance::calculate_bounding_box,
    filters::{matches_tags, within_radius},
};
use crate::models::{CatalogEntry, CatalogQuery, Product};

/// File name of the catalog inside the data directory
pub const CATALOG_FILE: &str = "products.json";

/// Errors that can occur when loading the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of a catalog search
#[derive(Debug)]
pub struct SearchResult {
    pub products: Vec<Product>,
    pub total_candidates: usize,
}

/// In-memory product catalog
///
/// # Search stages
/// 1. Geospatial bounding box pre-filter
/// 2. Exact radius check
/// 3. Tag filtering
/// 4. Ranking by popularity, then distance
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Load `products.json` from a data directory
    ///
    /// A missing file gives an empty catalog, a malformed one is an error.
    pub fn load<P: AsRef<Path>>(data_path: P) -> Result<Self, CatalogError> {
        let path = data_path.as_ref().join(CATALOG_FILE);

        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Catalog {} not found, serving an empty catalog", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let entries: Vec<CatalogEntry> = serde_json::from_str(&raw)?;
        tracing::info!("Loaded {} catalog entries from {}", entries.len(), path.display());

        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the most popular products within the query radius
    pub fn search(&self, query: &CatalogQuery) -> SearchResult {
        let total_candidates = self.entries.len();
        let bbox = calculate_bounding_box(query.origin, query.radius_meters);

        let mut hits: Vec<(f64, &CatalogEntry)> = self
            .entries
            .iter()
            .filter_map(|entry| within_radius(entry, query, &bbox).map(|d| (d, entry)))
            .filter(|(_, entry)| matches_tags(entry, &query.tags))
            .collect();

        // Sort by popularity (descending) and then by distance (ascending)
        hits.sort_by(|(dist_a, a), (dist_b, b)| {
            b.popularity
                .partial_cmp(&a.popularity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| dist_a.partial_cmp(dist_b).unwrap_or(std::cmp::Ordering::Equal))
        });

        hits.truncate(query.limit);

        SearchResult {
            products: hits.into_iter().map(|(_, entry)| entry.to_product()).collect(),
            total_candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LatLng;

    fn create_entry(title: &str, popularity: f64, lat: f64, lng: f64, tags: &[&str]) -> CatalogEntry {
        CatalogEntry {
            title: title.to_string(),
            popularity,
            shop: LatLng::new(lat, lng),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn create_query(radius_meters: f64, tags: &[&str], limit: usize) -> CatalogQuery {
        CatalogQuery {
            origin: LatLng::new(59.3325, 18.0649),
            radius_meters,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            limit,
        }
    }

    fn create_catalog() -> Catalog {
        Catalog::new(vec![
            create_entry("Latte", 0.4, 59.3327, 18.0652, &["coffee"]),
            create_entry("Kanelbulle", 0.9, 59.3330, 18.0660, &["bakery", "coffee"]),
            create_entry("Green tea", 0.7, 59.3320, 18.0640, &["tea"]),
            create_entry("Far away", 1.0, 59.8586, 17.6389, &["coffee"]),
        ])
    }

    #[test]
    fn test_search_sorted_by_popularity() {
        let result = create_catalog().search(&create_query(1_000.0, &[], 10));

        let titles: Vec<_> = result.products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Kanelbulle", "Green tea", "Latte"]);
        assert_eq!(result.total_candidates, 4);
    }

    #[test]
    fn test_search_filters_tags() {
        let result = create_catalog().search(&create_query(1_000.0, &["coffee"], 10));

        let titles: Vec<_> = result.products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Kanelbulle", "Latte"]);
    }

    #[test]
    fn test_search_respects_limit() {
        let result = create_catalog().search(&create_query(1_000.0, &[], 1));

        assert_eq!(result.products.len(), 1);
        assert_eq!(result.products[0].title, "Kanelbulle");
    }

    #[test]
    fn test_zero_radius_matches_only_origin() {
        let catalog = Catalog::new(vec![create_entry("Here", 0.1, 59.3325, 18.0649, &[])]);
        let result = catalog.search(&create_query(0.0, &[], 10));

        assert_eq!(result.products.len(), 1);
    }

    #[test]
    fn test_search_across_antimeridian() {
        let catalog = Catalog::new(vec![
            create_entry("Kava", 0.6, 10.0, -179.999, &[]),
            create_entry("Taro chips", 0.4, 10.0, -179.0, &[]),
        ]);
        let query = CatalogQuery {
            origin: LatLng::new(10.0, 179.999),
            radius_meters: 1_000.0,
            tags: vec![],
            limit: 10,
        };

        let result = catalog.search(&query);

        assert_eq!(result.products.len(), 1);
        assert_eq!(result.products[0].title, "Kava");
    }

    #[test]
    fn test_missing_catalog_is_empty() {
        let catalog = Catalog::load("does/not/exist").unwrap();
        assert!(catalog.is_empty());
    }
}
