use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// Current search parameters
///
/// One instance lives inside the `SearchExecutor`; everything else only sees
/// snapshots of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub origin: LatLng,
    #[serde(rename = "radius")]
    pub radius_meters: u32,
    #[serde(rename = "count")]
    pub result_count: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Preferences {
    pub const DEFAULT_RADIUS_METERS: u32 = 500;
    pub const DEFAULT_RESULT_COUNT: u32 = 10;
    /// Central Stockholm
    pub const DEFAULT_ORIGIN: LatLng = LatLng::new(59.332_58, 18.064_9);
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            origin: Self::DEFAULT_ORIGIN,
            radius_meters: Self::DEFAULT_RADIUS_METERS,
            result_count: Self::DEFAULT_RESULT_COUNT,
            tags: Vec::new(),
        }
    }
}

/// A product sold by a shop at a known location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    /// Normalized popularity in `[0, 1]`
    #[serde(rename = "popularity")]
    pub popularity_score: f64,
    #[serde(rename = "shop")]
    pub shop_coordinate: LatLng,
}

/// Product as stored in the catalog, with the tags it can be searched by
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    pub popularity: f64,
    pub shop: LatLng,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CatalogEntry {
    pub fn to_product(&self) -> Product {
        Product {
            title: self.title.clone(),
            popularity_score: self.popularity,
            shop_coordinate: self.shop,
        }
    }
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

/// Parameters of a catalog search
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    pub origin: LatLng,
    pub radius_meters: f64,
    pub tags: Vec<String>,
    pub limit: usize,
}
