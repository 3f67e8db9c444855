use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Notify;
use tokio::task::{JoinHandle, LocalSet};

use crate::models::{LatLng, Preferences, Product};

/// Errors that can occur while searching
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Search API returned error: {0}")]
    Api(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Search unavailable: {0}")]
    Unavailable(String),
}

/// Network side of a search
///
/// Implementations receive their own copy of the preferences and resolve to
/// exactly one outcome: an error or a (possibly empty) product list.
#[async_trait(?Send)]
pub trait SearchTransport {
    async fn search(&self, preferences: Preferences) -> Result<Vec<Product>, SearchError>;
}

/// Searches that have started but not resolved yet
#[derive(Debug, Default)]
pub struct PendingSearches {
    count: Cell<usize>,
    idle: Notify,
}

impl PendingSearches {
    pub fn len(&self) -> usize {
        self.count.get()
    }

    pub fn is_empty(&self) -> bool {
        self.count.get() == 0
    }

    /// Resolves once no search is pending
    pub async fn idle(&self) {
        while !self.is_empty() {
            self.idle.notified().await;
        }
    }

    fn start(&self) {
        self.count.set(self.count.get() + 1);
    }

    fn finish(&self) {
        self.count.set(self.count.get().saturating_sub(1));
        if self.is_empty() {
            self.idle.notify_waiters();
        }
    }
}

/// Holds the current search preferences and runs searches against a transport
pub struct SearchExecutor {
    preferences: Preferences,
    transport: Rc<dyn SearchTransport>,
    tasks: Rc<LocalSet>,
    pending: Rc<PendingSearches>,
}

impl SearchExecutor {
    /// Searches are spawned onto `tasks` and make progress while it is driven
    pub fn new(preferences: Preferences, transport: Rc<dyn SearchTransport>, tasks: Rc<LocalSet>) -> Self {
        Self {
            preferences,
            transport,
            tasks,
            pending: Rc::new(PendingSearches::default()),
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn set_radius(&mut self, radius_meters: u32) {
        tracing::debug!("radius -> {}m", radius_meters);
        self.preferences.radius_meters = radius_meters;
    }

    pub fn set_count(&mut self, count: u32) {
        tracing::debug!("count -> {}", count);
        self.preferences.result_count = count;
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        tracing::debug!("tags -> {:?}", tags);
        self.preferences.tags = tags;
    }

    pub fn set_origin(&mut self, origin: LatLng) {
        tracing::trace!("origin -> {}", origin);
        self.preferences.origin = origin;
    }

    /// Number of searches that have not resolved yet
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> Rc<PendingSearches> {
        Rc::clone(&self.pending)
    }

    /// Start a search with the preferences as they are right now
    ///
    /// `callback` runs exactly once, on a later turn of the task set. Later
    /// preference changes do not affect a search that is already running.
    /// Overlapping searches are allowed and resolve independently.
    pub fn search<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<Vec<Product>, SearchError>) + 'static,
    {
        let snapshot = self.preferences.clone();
        let transport = Rc::clone(&self.transport);
        let pending = Rc::clone(&self.pending);
        let request_id = uuid::Uuid::new_v4();

        pending.start();
        if pending.len() > 1 {
            tracing::debug!("Search {} overlaps {} pending search(es)", request_id, pending.len() - 1);
        }
        tracing::info!(
            "Search {} started: origin {}, radius {}m, count {}, tags {:?}",
            request_id,
            snapshot.origin,
            snapshot.radius_meters,
            snapshot.result_count,
            snapshot.tags
        );

        self.tasks.spawn_local(async move {
            let result = transport.search(snapshot).await;

            match &result {
                Ok(products) => tracing::info!("Search {} returned {} product(s)", request_id, products.len()),
                Err(e) => tracing::warn!("Search {} failed: {}", request_id, e),
            }

            callback(result);
            pending.finish();
        })
    }
}

impl fmt::Debug for SearchExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchExecutor")
            .field("preferences", &self.preferences)
            .field("in_flight", &self.pending.len())
            .finish_non_exhaustive()
    }
}
