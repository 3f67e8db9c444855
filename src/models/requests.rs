use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::filters::split_tags;
use crate::models::domain::{CatalogQuery, LatLng};

/// Query string of `GET /api/search`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[serde(default = "default_radius")]
    pub radius: u32,
    #[serde(default = "default_count")]
    pub count: u32,
    /// Comma separated tag list
    #[serde(default)]
    pub tags: Option<String>,
}

fn default_radius() -> u32 {
    500
}

fn default_count() -> u32 {
    10
}

impl SearchQuery {
    pub fn to_catalog_query(&self) -> CatalogQuery {
        CatalogQuery {
            origin: LatLng::new(self.lat, self.lng),
            radius_meters: f64::from(self.radius),
            tags: self.tags.as_deref().map(split_tags).unwrap_or_default(),
            limit: self.count as usize,
        }
    }
}
