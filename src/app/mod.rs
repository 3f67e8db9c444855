// Front-end component exports
pub mod controls;
pub mod coordinator;
pub mod map_view;
pub mod searcher;

pub use controls::{ControlPanel, PanelError};
pub use coordinator::{App, StartupError, Widgets};
pub use map_view::{MapSnapshot, MapView, product_feature, product_layer};
pub use searcher::{PendingSearches, SearchError, SearchExecutor, SearchTransport};
