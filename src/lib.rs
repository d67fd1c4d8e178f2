pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{ManualScheduler, SystemClock, TokioClock, TokioScheduler};
pub use crate::config::HelpersConfig;
pub use crate::core::array::{assign_array, flatten_one_level, splice_array};
pub use crate::core::classify::{classify, raw_type, Kind};
pub use crate::core::object::{deep_clone, deep_merge, has_own, multi_merge, ObjectOps};
pub use crate::core::strings::camelize;
pub use crate::core::style::{
    pad_px, px_to_num, style_pad_px, style_remove_px, style_toggle_px, PxMode,
};
pub use crate::core::timing::{Debounce, Throttle, DEFAULT_TIME_SLICE};
pub use crate::domain::model::Value;
pub use crate::utils::error::{HelperError, Result};
