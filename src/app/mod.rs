pub mod replay;

pub use replay::{ReplayReport, ScenarioReplay};
