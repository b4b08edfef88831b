// Adapters layer: in-memory implementations of the map's external collaborators.

pub mod action;
pub mod location;
pub mod map_surface;
pub mod subject;

pub use action::{RecordingActionSurface, RecordingNavigator};
pub use location::SimulatedLocation;
pub use map_surface::RecordingMapSurface;
pub use subject::SearchResultsObservable;
