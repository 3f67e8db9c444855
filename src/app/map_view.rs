use std::fmt;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

use crate::core::color_for;
use crate::events::{EventEmitter, MapEvent};
use crate::models::{LatLng, Product};
use crate::widgets::{
    CircleStyle, FeatureLayer, Gesture, LayerId, MapWidget, MarkerId, MarkerOptions, OverlayId,
    Pointer, PopupTrigger, SurfaceOptions, WidgetError,
};

/// Keeps the origin marker above product markers
const ORIGIN_MARKER_Z_OFFSET: i32 = 1000;

const SEARCH_AREA_STYLE: CircleStyle = CircleStyle {
    opacity: 0.7,
    weight: 0.5,
    fill_opacity: 0.2,
};

/// Gestures that would move the camera without going through the marker
const AMBIENT_ZOOM_GESTURES: [Gesture; 3] = [
    Gesture::TouchZoom,
    Gesture::DoubleClickZoom,
    Gesture::ScrollWheelZoom,
];

/// Copy of the map view state at one point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSnapshot {
    pub center: LatLng,
    pub overlay_radius: f64,
    pub marker: MarkerId,
    pub area: OverlayId,
    pub layer: Option<LayerId>,
}

/// Wraps the map widget
///
/// Owns the draggable search marker, the search area circle and the product
/// layer. Notifies the rest of the application about marker movement through
/// [`MapView::events`].
pub struct MapView {
    widget: Box<dyn MapWidget>,
    center: LatLng,
    overlay_radius: f64,
    marker: MarkerId,
    area: OverlayId,
    layer: Option<LayerId>,
    events: EventEmitter<MapEvent>,
}

impl MapView {
    /// Create the map surface, the origin marker and the search area
    pub fn initialize(
        mut widget: Box<dyn MapWidget>,
        surface: &SurfaceOptions,
        center: LatLng,
        initial_radius: f64,
    ) -> Result<Self, WidgetError> {
        widget.create_surface(surface)?;
        widget.set_view(center, surface.min_zoom);
        for gesture in AMBIENT_ZOOM_GESTURES {
            widget.disable_gesture(gesture);
        }

        let marker = widget.add_marker(
            center,
            &MarkerOptions {
                draggable: true,
                z_index_offset: ORIGIN_MARKER_Z_OFFSET,
            },
        )?;
        let area = widget.add_circle(center, initial_radius, &SEARCH_AREA_STYLE)?;

        tracing::debug!(
            "Map initialized at {} (zoom {}..={}, radius {}m)",
            center,
            surface.min_zoom,
            surface.max_zoom,
            initial_radius
        );

        Ok(Self {
            widget,
            center,
            overlay_radius: initial_radius,
            marker,
            area,
            layer: None,
            events: EventEmitter::new(),
        })
    }

    pub fn events(&self) -> &EventEmitter<MapEvent> {
        &self.events
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn overlay_radius(&self) -> f64 {
        self.overlay_radius
    }

    pub fn marker(&self) -> MarkerId {
        self.marker
    }

    pub fn area(&self) -> OverlayId {
        self.area
    }

    /// Currently attached product layer, if anything has been plotted
    pub fn layer(&self) -> Option<LayerId> {
        self.layer
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            center: self.center,
            overlay_radius: self.overlay_radius,
            marker: self.marker,
            area: self.area,
            layer: self.layer,
        }
    }

    /// Handle one drag-move of the origin marker
    ///
    /// The area follows the marker before `change:searchpos` is emitted.
    pub fn drag_marker(&mut self, position: LatLng) {
        self.widget.set_circle_center(self.area, position);
        self.center = position;
        self.events.emit(MapEvent::OriginChanged(position));
    }

    pub fn set_overlay_radius(&mut self, radius_meters: f64) {
        self.widget.set_circle_radius(self.area, radius_meters);
        self.overlay_radius = radius_meters;
    }

    /// Replace the product layer with one marker per product
    pub fn plot(&mut self, products: Vec<Product>) {
        let layer = product_layer(products);
        let count = layer.len();

        if let Some(previous) = self.layer.take() {
            if self.widget.has_layer(previous) {
                self.widget.detach_layer(previous);
            }
        }
        self.layer = Some(self.widget.attach_layer(layer));

        tracing::debug!("Plotted {} product(s)", count);
    }

    /// Hover popups: open on enter, close on leave
    pub fn feature_pointer(&mut self, layer: LayerId, feature: usize, pointer: Pointer) {
        if self.layer != Some(layer) {
            tracing::trace!("Ignoring pointer event for stale layer {:?}", layer);
            return;
        }

        match pointer {
            Pointer::Enter => self.widget.open_popup(layer, feature),
            Pointer::Leave => self.widget.close_popup(layer, feature),
        }
    }
}

impl fmt::Debug for MapView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapView")
            .field("center", &self.center)
            .field("overlay_radius", &self.overlay_radius)
            .field("marker", &self.marker)
            .field("area", &self.area)
            .field("layer", &self.layer)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

/// GeoJSON point feature for a product, colored by popularity
pub fn product_feature(product: Product) -> Feature {
    let color = color_for(product.popularity_score);

    let mut properties = JsonObject::new();
    properties.insert("title".to_string(), JsonValue::from(product.title));
    properties.insert("marker-color".to_string(), JsonValue::from(color));
    properties.insert("marker-size".to_string(), JsonValue::from("large"));
    properties.insert("marker-symbol".to_string(), JsonValue::from("heart"));

    let shop = product.shop_coordinate;
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![shop.lng, shop.lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn product_layer(products: Vec<Product>) -> FeatureLayer {
    FeatureLayer {
        collection: FeatureCollection {
            bbox: None,
            features: products.into_iter().map(product_feature).collect(),
            foreign_members: None,
        },
        popup: PopupTrigger::Hover,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MapEventKind;
    use crate::widgets::HeadlessMap;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn surface() -> SurfaceOptions {
        SurfaceOptions {
            container: "map".to_string(),
            style: "mapbox.streets".to_string(),
            access_token: None,
            min_zoom: 8,
            max_zoom: 18,
        }
    }

    fn create_view() -> (MapView, HeadlessMap) {
        let map = HeadlessMap::new();
        let view = MapView::initialize(
            Box::new(map.clone()),
            &surface(),
            LatLng::new(59.33258, 18.0649),
            500.0,
        )
        .unwrap();
        (view, map)
    }

    fn product(title: &str, popularity: f64) -> Product {
        Product {
            title: title.to_string(),
            popularity_score: popularity,
            shop_coordinate: LatLng::new(59.3330, 18.0660),
        }
    }

    #[test]
    fn test_initialize_fixes_camera() {
        let (view, map) = create_view();

        assert_eq!(map.view(), Some((LatLng::new(59.33258, 18.0649), 8)));
        assert!(map.is_gesture_disabled(Gesture::TouchZoom));
        assert!(map.is_gesture_disabled(Gesture::DoubleClickZoom));
        assert!(map.is_gesture_disabled(Gesture::ScrollWheelZoom));

        let (position, options) = map.marker(view.marker()).unwrap();
        assert_eq!(position, view.center());
        assert!(options.draggable);

        let area = map.circle(view.area()).unwrap();
        assert_eq!(area.center, view.center());
        assert_eq!(area.radius_meters, 500.0);
        assert!(view.layer().is_none());
    }

    #[test]
    fn test_drag_moves_area_then_emits() {
        let (mut view, map) = create_view();
        let area = view.area();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let observed_map = map.clone();
        let sink = Rc::clone(&seen);
        view.events().on(MapEventKind::OriginChanged, move |event| {
            // the area must already be in place when handlers run
            let MapEvent::OriginChanged(position) = event;
            let center = observed_map.circle(area).map(|c| c.center);
            sink.borrow_mut().push((*position, center));
        });

        let target = LatLng::new(59.40, 18.10);
        view.drag_marker(target);

        assert_eq!(*seen.borrow(), vec![(target, Some(target))]);
        assert_eq!(view.center(), target);
    }

    #[test]
    fn test_set_overlay_radius() {
        let (mut view, map) = create_view();
        view.set_overlay_radius(2000.0);

        assert_eq!(view.overlay_radius(), 2000.0);
        assert_eq!(view.snapshot().overlay_radius, 2000.0);
        assert_eq!(map.circle(view.area()).unwrap().radius_meters, 2000.0);
    }

    #[test]
    fn test_product_feature_properties() {
        let feature = product_feature(product("Kanelbulle", 1.0));

        assert_eq!(feature.property("title"), Some(&JsonValue::from("Kanelbulle")));
        assert_eq!(feature.property("marker-color"), Some(&JsonValue::from("#e51919")));
        assert_eq!(feature.property("marker-size"), Some(&JsonValue::from("large")));
        assert_eq!(feature.property("marker-symbol"), Some(&JsonValue::from("heart")));

        let geometry = feature.geometry.unwrap();
        assert_eq!(geometry.value, Value::Point(vec![18.0660, 59.3330]));
    }

    #[test]
    fn test_plot_replaces_layer() {
        let (mut view, map) = create_view();

        view.plot(vec![product("a", 0.1), product("b", 0.2)]);
        let first = view.layer().unwrap();
        view.plot(vec![product("c", 0.3)]);
        let second = view.layer().unwrap();

        let attached = map.attached_layers();
        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0].0, second);
        assert_eq!(attached[0].1.len(), 1);
        assert!(!map.layer_calls().is_empty());
        assert_ne!(first, second);
        assert_eq!(map.max_attached(), 1);
    }

    #[test]
    fn test_hover_popups_follow_current_layer() {
        let (mut view, map) = create_view();

        view.plot(vec![product("a", 0.5)]);
        let stale = view.layer().unwrap();
        view.plot(vec![product("b", 0.5)]);
        let current = view.layer().unwrap();

        view.feature_pointer(current, 0, Pointer::Enter);
        assert!(map.is_popup_open(current, 0));

        view.feature_pointer(current, 0, Pointer::Leave);
        assert!(!map.is_popup_open(current, 0));

        view.feature_pointer(stale, 0, Pointer::Enter);
        assert!(!map.is_popup_open(stale, 0));
    }
}
