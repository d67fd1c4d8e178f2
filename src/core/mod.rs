pub mod array;
pub mod classify;
pub mod object;
pub mod strings;
pub mod style;
pub mod timing;

pub use crate::domain::model::{Array, Callback, Map, Object, Opaque, Value};
pub use crate::domain::ports::{Clock, Scheduler, Task, TimerHandle};
pub use crate::utils::error::Result;
