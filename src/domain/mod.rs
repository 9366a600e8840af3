// Domain layer: survey value types and the strategy port.

pub mod model;
pub mod ports;
