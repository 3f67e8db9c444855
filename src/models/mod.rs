// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{LatLng, Preferences, Product, CatalogEntry, BoundingBox, CatalogQuery};
pub use requests::SearchQuery;
pub use responses::{SearchResponse, HealthResponse, ErrorResponse};
