// Domain layer: models, ports (interfaces) and the bundled fallback catalog.

pub mod fallback;
pub mod model;
pub mod ports;
