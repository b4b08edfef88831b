use crate::domain::model::{GeoPoint, ResultSet, Venue, VenueOverlay};
use std::sync::Arc;

/// Callback registered with a collaborator. Implementations must only enqueue
/// work; they are invoked from inside the collaborator's own call.
pub type Callback = Box<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Externally owned, shared search results.
pub trait ResultSubject {
    fn current_results(&self) -> Option<Arc<ResultSet>>;
    fn subscribe(&self, observer: Callback) -> SubscriptionId;
    /// Returns false when the id was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

pub trait LiveLocationProvider {
    fn current_fix(&self) -> Option<GeoPoint>;
    /// Runs once, when the first fix arrives (immediately if one already exists).
    fn run_on_first_fix(&self, callback: Callback);
    fn enable(&mut self);
    fn disable(&mut self);
}

/// Non-venue overlays, re-added after every clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistentOverlay {
    MyLocation,
}

pub trait MapSurface {
    fn install_overlays(&mut self, overlays: &[VenueOverlay]);
    fn clear_overlays(&mut self);
    fn add_persistent_overlay(&mut self, overlay: PersistentOverlay);
    fn move_to(&mut self, point: GeoPoint);
    fn set_zoom(&mut self, level: u8);
    fn set_builtin_zoom_controls(&mut self, enabled: bool);
    fn request_redraw(&mut self);
}

pub trait DetailNavigator {
    fn open_detail_for(&mut self, venue: &Venue);
}

pub trait ActionSurface {
    fn set_label(&mut self, text: &str);
    fn show(&mut self);
    fn hide(&mut self);
}

pub trait MapSettings {
    fn zoom_level(&self) -> u8;
    fn reset_selection_on_map_tap(&self) -> bool;
    fn reset_selection_on_resync(&self) -> bool;
}
