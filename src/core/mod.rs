pub mod filter;
pub mod overlay;
pub mod selection;
pub mod session;
pub mod synchronizer;

pub use crate::domain::model::{RenderGroup, ResultGroup, ResultSet, SelectionState, Venue};
pub use crate::domain::ports::{
    ActionSurface, DetailNavigator, LiveLocationProvider, MapSettings, MapSurface, ResultSubject,
};
pub use crate::utils::error::Result;
