// Domain layer: profile model and provider ports. No HTTP or config here.

pub mod model;
pub mod ports;
