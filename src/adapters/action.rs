use crate::domain::model::Venue;
use crate::domain::ports::{ActionSurface, DetailNavigator};
use serde::Serialize;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionState {
    pub label: Option<String>,
    pub visible: bool,
}

/// Action button stand-in that remembers its label and visibility.
#[derive(Debug, Clone, Default)]
pub struct RecordingActionSurface {
    state: Arc<Mutex<ActionState>>,
}

impl RecordingActionSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ActionState {
        self.state
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn label(&self) -> Option<String> {
        self.snapshot().label
    }

    pub fn is_visible(&self) -> bool {
        self.snapshot().visible
    }

    fn update(&self, f: impl FnOnce(&mut ActionState)) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut state);
    }
}

impl ActionSurface for RecordingActionSurface {
    fn set_label(&mut self, text: &str) {
        self.update(|s| s.label = Some(text.to_string()));
    }

    fn show(&mut self) {
        self.update(|s| s.visible = true);
    }

    fn hide(&mut self) {
        self.update(|s| s.visible = false);
    }
}

/// Collects every venue handed over for the detail view.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    opened: Arc<Mutex<Vec<Venue>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<Venue> {
        self.opened
            .lock()
            .map(|v| v.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn opened_ids(&self) -> Vec<String> {
        self.opened().into_iter().map(|v| v.id).collect()
    }
}

impl DetailNavigator for RecordingNavigator {
    fn open_detail_for(&mut self, venue: &Venue) {
        tracing::info!("📍 Opening detail view for {} ({})", venue.name, venue.id);
        self.opened
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(venue.clone());
    }
}
