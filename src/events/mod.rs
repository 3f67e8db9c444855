//! Application events and the emitter they travel through
//!
//! Components never reference each other. Each owns an [`EventEmitter`] for its
//! own event type; the coordinator subscribes handlers to them.

pub mod emitter;

pub use emitter::{Event, EventEmitter};

use crate::models::LatLng;

/// Events emitted by the control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    SearchRequested,
    RadiusChanged(u32),
    CountChanged(u32),
    TagsChanged(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlEventKind {
    SearchRequested,
    RadiusChanged,
    CountChanged,
    TagsChanged,
}

impl Event for ControlEvent {
    type Kind = ControlEventKind;

    fn kind(&self) -> ControlEventKind {
        match self {
            Self::SearchRequested => ControlEventKind::SearchRequested,
            Self::RadiusChanged(_) => ControlEventKind::RadiusChanged,
            Self::CountChanged(_) => ControlEventKind::CountChanged,
            Self::TagsChanged(_) => ControlEventKind::TagsChanged,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::SearchRequested => "search",
            Self::RadiusChanged(_) => "change:radius",
            Self::CountChanged(_) => "change:count",
            Self::TagsChanged(_) => "change:tags",
        }
    }
}

/// Events emitted by the map view
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    OriginChanged(LatLng),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    OriginChanged,
}

impl Event for MapEvent {
    type Kind = MapEventKind;

    fn kind(&self) -> MapEventKind {
        match self {
            Self::OriginChanged(_) => MapEventKind::OriginChanged,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::OriginChanged(_) => "change:searchpos",
        }
    }
}
