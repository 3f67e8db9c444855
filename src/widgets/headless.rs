//! In-memory widget doubles
//!
//! They keep every piece of widget state in plain Rust values so a host without
//! a browser can drive the application and inspect what would be on screen.
//! Clones share state.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::{
    CircleStyle, Control, FeatureLayer, FormNotification, FormWidgets, Gesture, LayerId, MapWidget,
    MarkerId, MarkerOptions, Notifier, OverlayId, SurfaceOptions, TagEntryOptions, WidgetError,
};
use crate::models::LatLng;

/// A call that changed the set of attached layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerCall {
    Attach(LayerId),
    Detach(LayerId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: LatLng,
    pub radius_meters: f64,
    pub style: CircleStyle,
}

#[derive(Debug, Default)]
struct MapState {
    unavailable: Option<String>,
    surface: Option<SurfaceOptions>,
    view: Option<(LatLng, u8)>,
    disabled: HashSet<Gesture>,
    markers: HashMap<MarkerId, (LatLng, MarkerOptions)>,
    circles: HashMap<OverlayId, Circle>,
    layers: Vec<(LayerId, FeatureLayer)>,
    popups: HashSet<(LayerId, usize)>,
    layer_calls: Vec<LayerCall>,
    max_attached: usize,
    next_id: u64,
}

impl MapState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_surface(&self) -> Result<(), WidgetError> {
        if self.surface.is_none() {
            return Err(WidgetError::Rejected("map surface not created".to_string()));
        }
        Ok(())
    }
}

/// Map widget that records state instead of drawing it
#[derive(Debug, Clone, Default)]
pub struct HeadlessMap {
    state: Rc<RefCell<MapState>>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map whose surface can never be created
    pub fn unavailable(reason: &str) -> Self {
        let map = Self::default();
        map.state.borrow_mut().unavailable = Some(reason.to_string());
        map
    }

    pub fn surface(&self) -> Option<SurfaceOptions> {
        self.state.borrow().surface.clone()
    }

    pub fn view(&self) -> Option<(LatLng, u8)> {
        self.state.borrow().view
    }

    pub fn is_gesture_disabled(&self, gesture: Gesture) -> bool {
        self.state.borrow().disabled.contains(&gesture)
    }

    pub fn marker(&self, marker: MarkerId) -> Option<(LatLng, MarkerOptions)> {
        self.state.borrow().markers.get(&marker).copied()
    }

    pub fn circle(&self, circle: OverlayId) -> Option<Circle> {
        self.state.borrow().circles.get(&circle).copied()
    }

    /// Move a marker the way a user drag would; the host then reports the
    /// position to the map view
    pub fn move_marker(&self, marker: MarkerId, position: LatLng) {
        if let Some((pos, _)) = self.state.borrow_mut().markers.get_mut(&marker) {
            *pos = position;
        }
    }

    pub fn attached_layers(&self) -> Vec<(LayerId, FeatureLayer)> {
        self.state.borrow().layers.clone()
    }

    pub fn layer_calls(&self) -> Vec<LayerCall> {
        self.state.borrow().layer_calls.clone()
    }

    /// Highest number of layers that were ever attached at the same time
    pub fn max_attached(&self) -> usize {
        self.state.borrow().max_attached
    }

    pub fn is_popup_open(&self, layer: LayerId, feature: usize) -> bool {
        self.state.borrow().popups.contains(&(layer, feature))
    }
}

impl MapWidget for HeadlessMap {
    fn create_surface(&mut self, options: &SurfaceOptions) -> Result<(), WidgetError> {
        let mut state = self.state.borrow_mut();
        if let Some(reason) = &state.unavailable {
            return Err(WidgetError::Unavailable(reason.clone()));
        }
        if options.min_zoom > options.max_zoom {
            return Err(WidgetError::Rejected(format!(
                "zoom range {}..={} is empty",
                options.min_zoom, options.max_zoom
            )));
        }
        state.surface = Some(options.clone());
        Ok(())
    }

    fn set_view(&mut self, center: LatLng, zoom: u8) {
        let mut state = self.state.borrow_mut();
        let zoom = match &state.surface {
            Some(surface) => zoom.clamp(surface.min_zoom, surface.max_zoom),
            None => zoom,
        };
        state.view = Some((center, zoom));
    }

    fn disable_gesture(&mut self, gesture: Gesture) {
        self.state.borrow_mut().disabled.insert(gesture);
    }

    fn add_marker(&mut self, position: LatLng, options: &MarkerOptions) -> Result<MarkerId, WidgetError> {
        let mut state = self.state.borrow_mut();
        state.require_surface()?;
        let id = MarkerId(state.next_id());
        state.markers.insert(id, (position, *options));
        Ok(id)
    }

    fn add_circle(
        &mut self,
        center: LatLng,
        radius_meters: f64,
        style: &CircleStyle,
    ) -> Result<OverlayId, WidgetError> {
        let mut state = self.state.borrow_mut();
        state.require_surface()?;
        let id = OverlayId(state.next_id());
        state.circles.insert(
            id,
            Circle {
                center,
                radius_meters,
                style: *style,
            },
        );
        Ok(id)
    }

    fn set_circle_center(&mut self, circle: OverlayId, center: LatLng) {
        if let Some(c) = self.state.borrow_mut().circles.get_mut(&circle) {
            c.center = center;
        }
    }

    fn set_circle_radius(&mut self, circle: OverlayId, radius_meters: f64) {
        if let Some(c) = self.state.borrow_mut().circles.get_mut(&circle) {
            c.radius_meters = radius_meters;
        }
    }

    fn attach_layer(&mut self, layer: FeatureLayer) -> LayerId {
        let mut state = self.state.borrow_mut();
        let id = LayerId(state.next_id());
        state.layers.push((id, layer));
        state.layer_calls.push(LayerCall::Attach(id));
        let attached = state.layers.len();
        if attached > state.max_attached {
            state.max_attached = attached;
        }
        id
    }

    fn detach_layer(&mut self, layer: LayerId) {
        let mut state = self.state.borrow_mut();
        state.layers.retain(|(id, _)| *id != layer);
        state.popups.retain(|(id, _)| *id != layer);
        state.layer_calls.push(LayerCall::Detach(layer));
    }

    fn has_layer(&self, layer: LayerId) -> bool {
        self.state.borrow().layers.iter().any(|(id, _)| *id == layer)
    }

    fn open_popup(&mut self, layer: LayerId, feature: usize) {
        self.state.borrow_mut().popups.insert((layer, feature));
    }

    fn close_popup(&mut self, layer: LayerId, feature: usize) {
        self.state.borrow_mut().popups.remove(&(layer, feature));
    }
}

#[derive(Debug, Default)]
struct FormState {
    missing: HashSet<Control>,
    values: HashMap<Control, String>,
    tag_entry: HashMap<Control, TagEntryOptions>,
}

/// Form controls held in memory
#[derive(Debug, Clone, Default)]
pub struct HeadlessForm {
    state: Rc<RefCell<FormState>>,
}

impl HeadlessForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form where `control` cannot be found
    pub fn without(control: Control) -> Self {
        let form = Self::default();
        form.state.borrow_mut().missing.insert(control);
        form
    }

    pub fn value(&self, control: Control) -> Option<String> {
        self.state.borrow().values.get(&control).cloned()
    }

    pub fn tag_entry(&self, control: Control) -> Option<TagEntryOptions> {
        self.state.borrow().tag_entry.get(&control).copied()
    }

    pub fn click(&self, control: Control) -> FormNotification {
        FormNotification::Click(control)
    }

    /// Set a control's value as the user would and return the notification
    pub fn change(&self, control: Control, value: &str) -> FormNotification {
        self.state.borrow_mut().values.insert(control, value.to_string());
        FormNotification::Change {
            control,
            value: value.to_string(),
        }
    }

    fn require(&self, control: Control) -> Result<(), WidgetError> {
        if self.state.borrow().missing.contains(&control) {
            return Err(WidgetError::Unavailable(format!("{:?} control not found", control)));
        }
        Ok(())
    }
}

impl FormWidgets for HeadlessForm {
    fn set_value(&mut self, control: Control, value: &str) -> Result<(), WidgetError> {
        self.require(control)?;
        self.state.borrow_mut().values.insert(control, value.to_string());
        Ok(())
    }

    fn enable_tag_entry(&mut self, control: Control, options: &TagEntryOptions) -> Result<(), WidgetError> {
        self.require(control)?;
        self.state.borrow_mut().tag_entry.insert(control, *options);
        Ok(())
    }
}

/// Notifier that collects alerts
#[derive(Debug, Clone, Default)]
pub struct HeadlessNotifier {
    alerts: Rc<RefCell<Vec<String>>>,
}

impl HeadlessNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Notifier for HeadlessNotifier {
    fn alert(&self, message: &str) {
        tracing::debug!("alert: {}", message);
        self.alerts.borrow_mut().push(message.to_string());
    }
}
