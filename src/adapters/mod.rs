// Adapters layer: concrete timer and clock implementations for the domain ports.

pub mod clock;
pub mod scheduler;

pub use clock::{SystemClock, TokioClock};
pub use scheduler::{ManualScheduler, TokioScheduler};
