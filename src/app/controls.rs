use thiserror::Error;

use crate::core::split_tags;
use crate::events::{ControlEvent, EventEmitter};
use crate::models::Preferences;
use crate::widgets::{Control, FormNotification, FormWidgets, Propagation, TagEntryOptions, WidgetError};

/// Errors raised while adapting form notifications
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PanelError {
    #[error("{control:?} expects a non-negative whole number, got {input:?}")]
    InvalidNumber { control: Control, input: String },

    #[error("No handler bound for {0:?}")]
    Unbound(FormNotification),
}

/// Wraps the control box and adapts form notifications to application events
///
/// It never touches preferences or the map; everything leaves through
/// [`ControlPanel::events`].
#[derive(Debug, Default)]
pub struct ControlPanel {
    events: EventEmitter<ControlEvent>,
}

impl ControlPanel {
    /// Seed the widgets with the current preferences and enable tag entry
    pub fn bind(form: &mut dyn FormWidgets, preferences: &Preferences) -> Result<Self, WidgetError> {
        form.set_value(Control::Radius, &preferences.radius_meters.to_string())?;
        form.set_value(Control::Count, &preferences.result_count.to_string())?;
        form.enable_tag_entry(Control::Tags, &TagEntryOptions::default())?;

        Ok(Self::default())
    }

    pub fn events(&self) -> &EventEmitter<ControlEvent> {
        &self.events
    }

    /// Translate one native notification into an application event
    ///
    /// Malformed numbers are rejected: nothing is emitted and the error is
    /// returned to the caller.
    pub fn handle(&self, notification: FormNotification) -> Result<Propagation, PanelError> {
        match notification {
            FormNotification::Click(Control::Search) => {
                self.events.emit(ControlEvent::SearchRequested);
                Ok(Propagation::Suppress)
            }
            FormNotification::Change {
                control: Control::Radius,
                value,
            } => {
                let radius = parse_number(Control::Radius, &value)?;
                self.events.emit(ControlEvent::RadiusChanged(radius));
                Ok(Propagation::Suppress)
            }
            FormNotification::Change {
                control: Control::Count,
                value,
            } => {
                let count = parse_number(Control::Count, &value)?;
                self.events.emit(ControlEvent::CountChanged(count));
                Ok(Propagation::Suppress)
            }
            FormNotification::Change {
                control: Control::Tags,
                value,
            } => {
                self.events.emit(ControlEvent::TagsChanged(split_tags(&value)));
                Ok(Propagation::Continue)
            }
            other => Err(PanelError::Unbound(other)),
        }
    }
}

fn parse_number(control: Control, input: &str) -> Result<u32, PanelError> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| PanelError::InvalidNumber {
            control,
            input: input.to_string(),
        })
}
