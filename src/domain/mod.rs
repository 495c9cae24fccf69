// Domain layer: core models and ports (interfaces). Only serde/csv attributes beyond std.

pub mod model;
pub mod ports;
