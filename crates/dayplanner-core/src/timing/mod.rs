mod source;
mod window;

pub use source::{Clock, ManualClock, SystemClock};
pub use window::{evaluate_window, WindowMatch, WindowThresholds};
