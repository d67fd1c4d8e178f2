// Domain layer: the dynamic value model and the timer ports (interfaces).

pub mod model;
pub mod ports;
