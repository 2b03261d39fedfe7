use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in a writing session produces an Event.
/// The controller folds them into the snapshot; hosts may log or forward them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ClockStarted {
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    ClockTicked {
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    /// A pace offset was reached and a hint was picked.
    HintPublished {
        hint: String,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    /// Gentle haptic requested (one minute left, or time up).
    HapticRequested {
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero.
    TimeUp {
        at: DateTime<Utc>,
    },
    /// User submitted the story for checking.
    StoppedForCheck {
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    ClockReset {
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
}
