// Core algorithm exports
pub mod catalog;
pub mod color;
pub mod distance;
pub mod filters;

pub use catalog::{Catalog, CatalogError, SearchResult};
pub use color::{color_for, hsl_to_hex, hsl_to_rgb, hue_for};
pub use distance::{haversine_distance, calculate_bounding_box, is_within_bounding_box};
pub use filters::{split_tags, matches_tags, within_radius};
