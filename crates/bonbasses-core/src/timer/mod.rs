mod clock;
mod pace;

pub use clock::{ClockState, SessionClock};
pub use pace::{hint_offsets_for, Pace};
