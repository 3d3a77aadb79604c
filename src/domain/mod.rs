// Domain layer: core models and ports (interfaces to the host application).

pub mod model;
pub mod ports;
