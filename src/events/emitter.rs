use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// An application event that can be routed by kind
pub trait Event: 'static {
    /// Payload-free discriminant handlers subscribe to
    type Kind: Copy + Eq + Hash + fmt::Debug;

    fn kind(&self) -> Self::Kind;

    /// Wire-style name used in logs, e.g. `change:radius`
    fn name(&self) -> &'static str;
}

type Handler<E> = Box<dyn FnMut(&E)>;

/// Synchronous `{on, emit}` capability composed into each component
///
/// Handlers run on the emitting thread, in subscription order, before `emit`
/// returns. There is no queue. A handler must not emit on, or subscribe to,
/// the emitter that is currently dispatching to it.
pub struct EventEmitter<E: Event> {
    handlers: RefCell<HashMap<E::Kind, Vec<Handler<E>>>>,
}

impl<E: Event> EventEmitter<E> {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(HashMap::new()),
        }
    }

    /// Subscribe a handler to one kind of event
    pub fn on<F>(&self, kind: E::Kind, handler: F)
    where
        F: FnMut(&E) + 'static,
    {
        match self.handlers.try_borrow_mut() {
            Ok(mut handlers) => handlers.entry(kind).or_default().push(Box::new(handler)),
            Err(_) => {
                tracing::error!("Cannot subscribe to {:?} while its emitter is dispatching", kind);
            }
        }
    }

    /// Dispatch an event to every handler subscribed to its kind
    ///
    /// Returns the number of handlers that ran.
    pub fn emit(&self, event: E) -> usize {
        let Ok(mut handlers) = self.handlers.try_borrow_mut() else {
            tracing::error!("Dropped re-entrant emission of {}", event.name());
            return 0;
        };

        let Some(subscribed) = handlers.get_mut(&event.kind()) else {
            tracing::trace!("No handlers for {}", event.name());
            return 0;
        };

        tracing::trace!("Emitting {} to {} handler(s)", event.name(), subscribed.len());
        for handler in subscribed.iter_mut() {
            handler(&event);
        }
        subscribed.len()
    }

    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.handlers
            .borrow()
            .get(&kind)
            .map_or(0, Vec::len)
    }
}

impl<E: Event> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: Vec<(E::Kind, usize)> = match self.handlers.try_borrow() {
            Ok(handlers) => handlers.iter().map(|(k, v)| (*k, v.len())).collect(),
            Err(_) => Vec::new(),
        };
        f.debug_struct("EventEmitter")
            .field("handlers", &counts)
            .finish()
    }
}
