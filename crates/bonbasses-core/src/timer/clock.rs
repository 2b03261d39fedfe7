//! Session countdown clock.
//!
//! The clock is a caller-driven state machine: it owns no thread or task.
//! The session runtime calls `tick()` once per second while it is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Stopped { time_up }
//!   ^                     |
//!   +------ reset --------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut clock = SessionClock::new(420, 7, Pace::Steady, true, rotation);
//! clock.start();
//! // Once per second:
//! for event in clock.tick() { /* apply */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::pace::Pace;
use crate::events::Event;
use crate::hints::HintRotation;

/// Seconds-remaining values that request a gentle haptic.
const HAPTIC_MARKS: [u32; 2] = [60, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ClockState {
    Idle,
    Running,
    /// Terminal for the attempt. `time_up` is false when the user stopped
    /// the clock to check their story.
    Stopped { time_up: bool },
}

/// Countdown with pace-dependent hint and haptic marks.
#[derive(Debug, Clone)]
pub struct SessionClock {
    state: ClockState,
    seconds_remaining: u32,
    /// Full session length; `reset()` restores this.
    session_seconds: u32,
    pace: Pace,
    gentle_haptics: bool,
    rotation: HintRotation,
}

impl SessionClock {
    /// Create an idle clock.
    ///
    /// `seconds_remaining` may be lower than the session length when a
    /// session is resumed.
    pub fn new(
        seconds_remaining: u32,
        session_minutes: u32,
        pace: Pace,
        gentle_haptics: bool,
        rotation: HintRotation,
    ) -> Self {
        Self {
            state: ClockState::Idle,
            seconds_remaining,
            session_seconds: session_minutes.saturating_mul(60),
            pace,
            gentle_haptics,
            rotation,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn session_seconds(&self) -> u32 {
        self.session_seconds
    }

    pub fn pace(&self) -> Pace {
        self.pace
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn is_time_up(&self) -> bool {
        self.state == ClockState::Stopped { time_up: true }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume the countdown. No-op while already running.
    pub fn start(&mut self) -> Vec<Event> {
        let from_idle = match self.state {
            ClockState::Running => return Vec::new(),
            ClockState::Idle => true,
            ClockState::Stopped { .. } => false,
        };

        if self.seconds_remaining == 0 {
            // A resumed session with no time left expires once, on first start.
            if !from_idle {
                return Vec::new();
            }
            self.state = ClockState::Stopped { time_up: true };
            return vec![Event::TimeUp { at: Utc::now() }];
        }

        self.state = ClockState::Running;
        let mut events = vec![Event::ClockStarted {
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        }];
        // A session that begins exactly on a mark gets that hint immediately.
        if from_idle && self.pace.is_hint_offset(self.seconds_remaining) {
            events.extend(self.publish_hint());
        }
        events
    }

    /// Advance one second. No-op unless running.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.state != ClockState::Running {
            return Vec::new();
        }

        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        let remaining = self.seconds_remaining;
        let mut events = vec![Event::ClockTicked {
            seconds_remaining: remaining,
            at: Utc::now(),
        }];

        if self.pace.is_hint_offset(remaining) {
            events.extend(self.publish_hint());
        }
        if self.gentle_haptics && HAPTIC_MARKS.contains(&remaining) {
            events.push(Event::HapticRequested {
                seconds_remaining: remaining,
                at: Utc::now(),
            });
        }
        if remaining == 0 {
            self.state = ClockState::Stopped { time_up: true };
            events.push(Event::TimeUp { at: Utc::now() });
        }
        events
    }

    /// Stop because the user submitted. Does not count as time up.
    pub fn stop_for_check(&mut self) -> Option<Event> {
        if self.state != ClockState::Running {
            return None;
        }
        self.state = ClockState::Stopped { time_up: false };
        Some(Event::StoppedForCheck {
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    /// Back to idle with the full session length.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = ClockState::Idle;
        self.seconds_remaining = self.session_seconds;
        self.rotation.reset();
        Some(Event::ClockReset {
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn publish_hint(&mut self) -> Option<Event> {
        let hint = self.rotation.next();
        if hint.is_empty() {
            return None;
        }
        Some(Event::HintPublished {
            hint,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotation(items: &[&str]) -> HintRotation {
        HintRotation::with_seed(items.iter().map(|s| s.to_string()).collect(), 11)
    }

    fn hints_in(events: &[Event]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::HintPublished { hint, .. } => Some(hint.clone()),
                _ => None,
            })
            .collect()
    }

    fn has_time_up(events: &[Event]) -> bool {
        events.iter().any(|e| matches!(e, Event::TimeUp { .. }))
    }

    fn has_haptic(events: &[Event]) -> bool {
        events.iter().any(|e| matches!(e, Event::HapticRequested { .. }))
    }

    #[test]
    fn start_stop_reset() {
        let mut clock = SessionClock::new(420, 7, Pace::Steady, true, rotation(&[]));
        assert_eq!(clock.state(), ClockState::Idle);

        assert!(!clock.start().is_empty());
        assert!(clock.is_running());
        assert!(clock.start().is_empty(), "second start is a no-op");

        assert!(clock.stop_for_check().is_some());
        assert_eq!(clock.state(), ClockState::Stopped { time_up: false });
        assert!(clock.stop_for_check().is_none());

        clock.reset();
        assert_eq!(clock.state(), ClockState::Idle);
        assert_eq!(clock.seconds_remaining(), 420);
    }

    #[test]
    fn steady_session_publishes_at_420_and_60_then_expires_once() {
        let mut clock = SessionClock::new(420, 7, Pace::Steady, false, rotation(&["A", "B", "C"]));
        let mut hint_marks = Vec::new();
        let mut time_ups = 0;

        let started = clock.start();
        if !hints_in(&started).is_empty() {
            hint_marks.push(clock.seconds_remaining());
        }

        let mut previous = clock.seconds_remaining();
        for _ in 0..500 {
            let events = clock.tick();
            assert!(clock.seconds_remaining() <= previous);
            previous = clock.seconds_remaining();
            if !hints_in(&events).is_empty() {
                hint_marks.push(clock.seconds_remaining());
            }
            if has_time_up(&events) {
                time_ups += 1;
            }
        }

        assert_eq!(hint_marks, vec![420, 60]);
        assert_eq!(time_ups, 1);
        assert_eq!(clock.seconds_remaining(), 0);
        assert!(clock.is_time_up());
        assert!(clock.tick().is_empty());
    }

    #[test]
    fn check_before_zero_is_not_time_up() {
        let mut clock = SessionClock::new(120, 7, Pace::Steady, true, rotation(&[]));
        clock.start();
        for _ in 0..30 {
            clock.tick();
        }
        clock.stop_for_check();
        assert!(!clock.is_time_up());
        assert_eq!(clock.seconds_remaining(), 90);
        assert!(clock.tick().is_empty());
    }

    #[test]
    fn haptics_fire_at_one_minute_and_zero_when_enabled() {
        let mut clock = SessionClock::new(62, 7, Pace::Fast, true, rotation(&[]));
        clock.start();
        let mut haptic_marks = Vec::new();
        while clock.is_running() {
            let events = clock.tick();
            if has_haptic(&events) {
                haptic_marks.push(clock.seconds_remaining());
            }
        }
        assert_eq!(haptic_marks, vec![60, 0]);
    }

    #[test]
    fn haptics_stay_quiet_when_disabled() {
        let mut clock = SessionClock::new(61, 7, Pace::Steady, false, rotation(&[]));
        clock.start();
        while clock.is_running() {
            assert!(!has_haptic(&clock.tick()));
        }
    }

    #[test]
    fn resumed_below_offset_skips_that_hint() {
        let mut clock = SessionClock::new(400, 7, Pace::Fast, false, rotation(&["A", "B"]));
        let mut marks = Vec::new();
        if !hints_in(&clock.start()).is_empty() {
            marks.push(clock.seconds_remaining());
        }
        while clock.is_running() {
            if !hints_in(&clock.tick()).is_empty() {
                marks.push(clock.seconds_remaining());
            }
        }
        assert_eq!(marks, vec![210]);
    }

    #[test]
    fn empty_rotation_publishes_nothing() {
        let mut clock = SessionClock::new(421, 7, Pace::Steady, false, rotation(&[]));
        clock.start();
        assert!(hints_in(&clock.tick()).is_empty());
        assert_eq!(clock.seconds_remaining(), 420);
    }

    #[test]
    fn restarting_after_check_does_not_repeat_start_hint() {
        let mut clock = SessionClock::new(420, 7, Pace::Steady, false, rotation(&["A", "B"]));
        assert_eq!(hints_in(&clock.start()).len(), 1);
        clock.stop_for_check();
        assert!(hints_in(&clock.start()).is_empty());
    }

    #[test]
    fn starting_with_no_time_left_expires_once() {
        let mut clock = SessionClock::new(0, 7, Pace::Steady, true, rotation(&[]));
        assert!(has_time_up(&clock.start()));
        assert!(clock.is_time_up());
        assert!(clock.start().is_empty());
        assert!(clock.tick().is_empty());
    }

    #[test]
    fn ten_minute_session_passes_through_420() {
        let mut clock = SessionClock::new(600, 10, Pace::Steady, false, rotation(&["A", "B"]));
        assert!(hints_in(&clock.start()).is_empty());
        let mut marks = Vec::new();
        while clock.is_running() {
            if !hints_in(&clock.tick()).is_empty() {
                marks.push(clock.seconds_remaining());
            }
        }
        assert_eq!(marks, vec![420, 60]);
    }
}
