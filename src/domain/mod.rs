// Domain layer: person records and the ports the batch pipeline is built on.

pub mod model;
pub mod ports;
