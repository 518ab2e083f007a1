mod clock;
mod session;
mod ticker;

pub use clock::{ClockReading, PomodoroClock};
pub use session::{PomodoroSession, INTERVALS_PER_LONG_BREAK};
pub use ticker::{PomodoroTicker, DEFAULT_TICK_INTERVAL};
