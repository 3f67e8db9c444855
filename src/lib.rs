//! Product Map - map-based product search
//!
//! The front-end core keeps a map view, a control panel and a search executor
//! consistent purely through events wired by [`app::App`]. The UI toolkit and
//! the network are injected through the traits in [`widgets`] and
//! [`app::SearchTransport`]. The crate also ships the catalog search service the
//! front end queries.

pub mod app;
pub mod config;
pub mod core;
pub mod events;
pub mod models;
pub mod routes;
pub mod services;
pub mod widgets;

// Re-export commonly used types
pub use app::{App, ControlPanel, MapView, SearchExecutor, SearchTransport, SearchError, Widgets};
pub use core::{Catalog, color_for, split_tags};
pub use models::{LatLng, Preferences, Product};
