pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::ScenarioConfig;

pub use crate::app::{ReplayReport, ScenarioReplay};
pub use crate::core::{
    selection::{SelectionController, SelectionPolicy},
    session::{event_channel, MapEvent, MapSession},
    synchronizer::MapOverlaySynchronizer,
};
pub use crate::utils::error::{MapError, Result};
