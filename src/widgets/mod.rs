//! Collaborator interfaces for the UI toolkit
//!
//! The application never reaches for a global map or DOM handle. Whatever hosts
//! it (browser bindings, a native shell, the headless doubles in [`headless`])
//! implements these traits and hands them to the coordinator.

pub mod headless;

pub use headless::{HeadlessForm, HeadlessMap, HeadlessNotifier};

use geojson::FeatureCollection;
use thiserror::Error;

use crate::models::LatLng;

/// Errors reported by widget collaborators
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("Widget unavailable: {0}")]
    Unavailable(String),

    #[error("Widget rejected the request: {0}")]
    Rejected(String),
}

/// Handle to a marker placed on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// Handle to a vector overlay (circle) on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u64);

/// Handle to an attached feature layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// Map surface configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceOptions {
    pub container: String,
    pub style: String,
    pub access_token: Option<String>,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

/// Ambient zoom gestures the map can respond to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    TouchZoom,
    DoubleClickZoom,
    ScrollWheelZoom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerOptions {
    pub draggable: bool,
    pub z_index_offset: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleStyle {
    pub opacity: f64,
    pub weight: f64,
    pub fill_opacity: f64,
}

/// When a feature's popup is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupTrigger {
    /// Open on pointer enter, close on pointer leave
    Hover,
}

/// A GeoJSON point layer ready to be attached
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLayer {
    pub collection: FeatureCollection,
    pub popup: PopupTrigger,
}

impl FeatureLayer {
    pub fn len(&self) -> usize {
        self.collection.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.features.is_empty()
    }
}

/// Pointer transitions over a rendered feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Enter,
    Leave,
}

/// Interactive map widget
///
/// Surface and overlay creation may fail (the widget library is missing, the
/// container does not exist). Mutations of existing handles cannot.
pub trait MapWidget {
    fn create_surface(&mut self, options: &SurfaceOptions) -> Result<(), WidgetError>;
    fn set_view(&mut self, center: LatLng, zoom: u8);
    fn disable_gesture(&mut self, gesture: Gesture);

    fn add_marker(&mut self, position: LatLng, options: &MarkerOptions) -> Result<MarkerId, WidgetError>;
    fn add_circle(
        &mut self,
        center: LatLng,
        radius_meters: f64,
        style: &CircleStyle,
    ) -> Result<OverlayId, WidgetError>;
    fn set_circle_center(&mut self, circle: OverlayId, center: LatLng);
    fn set_circle_radius(&mut self, circle: OverlayId, radius_meters: f64);

    fn attach_layer(&mut self, layer: FeatureLayer) -> LayerId;
    fn detach_layer(&mut self, layer: LayerId);
    fn has_layer(&self, layer: LayerId) -> bool;
    fn open_popup(&mut self, layer: LayerId, feature: usize);
    fn close_popup(&mut self, layer: LayerId, feature: usize);
}

/// Form controls of the search panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Search,
    Radius,
    Count,
    Tags,
}

/// Free-text tag entry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagEntryOptions {
    pub delimiter: char,
    /// Keep user-created options around after they are removed
    pub persist: bool,
    pub create: bool,
}

impl Default for TagEntryOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            persist: false,
            create: true,
        }
    }
}

/// Native notifications delivered by the form widgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormNotification {
    Click(Control),
    Change { control: Control, value: String },
}

/// Whether the widget's default action should still run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    /// Prevent the default action (form submission)
    Suppress,
}

pub trait FormWidgets {
    fn set_value(&mut self, control: Control, value: &str) -> Result<(), WidgetError>;
    fn enable_tag_entry(&mut self, control: Control, options: &TagEntryOptions) -> Result<(), WidgetError>;
}

/// Blocking, user-visible notification
pub trait Notifier {
    fn alert(&self, message: &str);
}
