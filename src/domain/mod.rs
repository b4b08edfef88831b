// Domain layer: venue models and ports (interfaces) for the map's external collaborators.

pub mod model;
pub mod ports;
