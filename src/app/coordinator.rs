use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use thiserror::Error;
use tokio::task::LocalSet;

use crate::app::{ControlPanel, MapSnapshot, MapView, PanelError, PendingSearches, SearchExecutor, SearchTransport};
use crate::config::ClientSettings;
use crate::events::{ControlEvent, ControlEventKind, MapEvent, MapEventKind};
use crate::models::{LatLng, Preferences};
use crate::widgets::{
    FormNotification, FormWidgets, LayerId, MapWidget, Notifier, Pointer, Propagation, WidgetError,
};

/// Errors that abort startup
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Widget initialization failed: {0}")]
    Widget(#[from] WidgetError),
}

/// Everything the application needs from its host
pub struct Widgets {
    pub map: Box<dyn MapWidget>,
    pub form: Box<dyn FormWidgets>,
    pub notifier: Rc<dyn Notifier>,
    pub transport: Rc<dyn SearchTransport>,
}

/// The running application: three components and the routes between them
///
/// Only this type holds references to more than one component. The routing
/// table is installed once in [`App::start`]:
///
/// | event | handler |
/// |---|---|
/// | `search` | search, then plot the products or alert the error |
/// | `change:radius` | update preferences and the search area radius |
/// | `change:count` | update preferences |
/// | `change:tags` | update preferences |
/// | `change:searchpos` | update preferences |
///
/// Native notifications enter through [`App::form_notification`],
/// [`App::marker_drag`] and [`App::feature_pointer`]. Searches run on the
/// app's own task set; they make progress while the host awaits
/// [`App::run_until`] or [`App::settle`].
pub struct App {
    controls: Rc<ControlPanel>,
    searcher: Rc<RefCell<SearchExecutor>>,
    map: Rc<RefCell<MapView>>,
    tasks: Rc<LocalSet>,
    pending: Rc<PendingSearches>,
    // owned so the form outlives every handler bound to it
    _form: Box<dyn FormWidgets>,
}

impl App {
    /// Build the components and wire their events
    pub fn start(settings: &ClientSettings, widgets: Widgets) -> Result<Self, StartupError> {
        let Widgets {
            map,
            mut form,
            notifier,
            transport,
        } = widgets;

        let preferences = Preferences::from(&settings.defaults);
        let tasks = Rc::new(LocalSet::new());

        let controls = Rc::new(ControlPanel::bind(form.as_mut(), &preferences)?);
        let searcher = SearchExecutor::new(preferences.clone(), transport, Rc::clone(&tasks));
        let pending = searcher.pending();
        let searcher = Rc::new(RefCell::new(searcher));
        let map = Rc::new(RefCell::new(MapView::initialize(
            map,
            &settings.map.surface_options(),
            preferences.origin,
            f64::from(preferences.radius_meters),
        )?));

        route_search(&controls, &searcher, &map, notifier);
        route_preferences(&controls, &searcher, &map);
        route_origin(&map, &searcher);

        tracing::info!(
            "Application started at {} (radius {}m, count {})",
            preferences.origin,
            preferences.radius_meters,
            preferences.result_count
        );

        Ok(Self {
            controls,
            searcher,
            map,
            tasks,
            pending,
            _form: form,
        })
    }

    pub fn controls(&self) -> &ControlPanel {
        &self.controls
    }

    pub fn map_state(&self) -> MapSnapshot {
        self.map.borrow().snapshot()
    }

    /// Snapshot of the current preferences
    pub fn preferences(&self) -> Preferences {
        self.searcher.borrow().preferences().clone()
    }

    /// Number of searches that have not resolved yet
    pub fn pending_searches(&self) -> usize {
        self.pending.len()
    }

    /// Deliver a native form notification to the control panel
    pub fn form_notification(&self, notification: FormNotification) -> Result<Propagation, PanelError> {
        self.controls.handle(notification).inspect_err(|e| {
            tracing::warn!("Rejected form input: {}", e);
        })
    }

    /// Deliver one drag-move of the origin marker
    pub fn marker_drag(&self, position: LatLng) {
        self.map.borrow_mut().drag_marker(position);
    }

    /// Deliver a pointer transition over a plotted product
    pub fn feature_pointer(&self, layer: LayerId, feature: usize, pointer: Pointer) {
        self.map.borrow_mut().feature_pointer(layer, feature, pointer);
    }

    /// Drive `future` while letting running searches make progress
    pub async fn run_until<F: Future>(&self, future: F) -> F::Output {
        self.tasks.run_until(future).await
    }

    /// Drive running searches until every one of them has resolved
    pub async fn settle(&self) {
        let pending = Rc::clone(&self.pending);
        self.tasks.run_until(async move { pending.idle().await }).await;
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("controls", &self.controls)
            .field("searcher", &self.searcher)
            .field("map", &self.map)
            .finish_non_exhaustive()
    }
}

fn route_search(
    controls: &ControlPanel,
    searcher: &Rc<RefCell<SearchExecutor>>,
    map: &Rc<RefCell<MapView>>,
    notifier: Rc<dyn Notifier>,
) {
    let searcher = Rc::clone(searcher);
    let map = Rc::clone(map);

    controls.events().on(ControlEventKind::SearchRequested, move |_| {
        let map = Rc::clone(&map);
        let notifier = Rc::clone(&notifier);

        // the handle is dropped; the task keeps running on the app's task set
        let _ = searcher.borrow().search(move |result| match result {
            Ok(products) => map.borrow_mut().plot(products),
            Err(e) => notifier.alert(&e.to_string()),
        });
    });
}

fn route_preferences(
    controls: &ControlPanel,
    searcher: &Rc<RefCell<SearchExecutor>>,
    map: &Rc<RefCell<MapView>>,
) {
    {
        let searcher = Rc::clone(searcher);
        let map = Rc::clone(map);
        controls.events().on(ControlEventKind::RadiusChanged, move |event| {
            if let ControlEvent::RadiusChanged(radius) = event {
                searcher.borrow_mut().set_radius(*radius);
                map.borrow_mut().set_overlay_radius(f64::from(*radius));
            }
        });
    }

    {
        let searcher = Rc::clone(searcher);
        controls.events().on(ControlEventKind::CountChanged, move |event| {
            if let ControlEvent::CountChanged(count) = event {
                searcher.borrow_mut().set_count(*count);
            }
        });
    }

    let searcher = Rc::clone(searcher);
    controls.events().on(ControlEventKind::TagsChanged, move |event| {
        if let ControlEvent::TagsChanged(tags) = event {
            searcher.borrow_mut().set_tags(tags.clone());
        }
    });
}

fn route_origin(map: &Rc<RefCell<MapView>>, searcher: &Rc<RefCell<SearchExecutor>>) {
    let searcher = Rc::clone(searcher);

    map.borrow().events().on(MapEventKind::OriginChanged, move |event| {
        let MapEvent::OriginChanged(position) = event;
        searcher.borrow_mut().set_origin(*position);
    });
}
