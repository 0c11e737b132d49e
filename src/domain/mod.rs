// Domain layer: the seller item records and the ports (traits) implemented by the adapters.

pub mod model;
pub mod ports;
