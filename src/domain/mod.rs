// Domain layer: records and ports (interfaces). Nothing here talks to storage, timers or the network.

pub mod model;
pub mod ports;
