use uuid::Uuid;

use crate::entitlement::{session_minutes, DEFAULT_SESSION_MINUTES};
use crate::error::Result;
use crate::platform::{EntitlementService, PreferencesStore, PACE_QUESTION_ID};
use crate::timer::Pace;

/// Everything fixed for one writing attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub session_id: Uuid,
    /// Prompt words, in display order.
    pub words: Vec<String>,
    /// Text carried over from a resumed attempt.
    pub initial_text: String,
    /// `None` for a fresh session (full length), `Some` when resuming.
    pub initial_seconds_remaining: Option<u32>,
    pub session_minutes: u32,
    pub pace: Pace,
    pub gentle_haptics: bool,
    pub typing_sounds: bool,
    pub hints: Vec<String>,
    /// Fixes the hint order; `None` picks randomly.
    pub hint_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            words: Vec::new(),
            initial_text: String::new(),
            initial_seconds_remaining: None,
            session_minutes: DEFAULT_SESSION_MINUTES,
            pace: Pace::Steady,
            gentle_haptics: true,
            typing_sounds: false,
            hints: Vec::new(),
            hint_seed: None,
        }
    }
}

impl SessionConfig {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            words,
            ..Self::default()
        }
    }

    /// Build a fresh session from stored preferences.
    ///
    /// Unreadable preferences fall back to defaults. A 10-minute preference
    /// only applies when the extended timer is owned.
    pub fn from_preferences(
        words: Vec<String>,
        hints: Vec<String>,
        prefs: &dyn PreferencesStore,
        entitlements: &dyn EntitlementService,
    ) -> Self {
        let pace = or_default(prefs.answer(PACE_QUESTION_ID), "pace answer")
            .map(|answer| Pace::from_answer(&answer))
            .unwrap_or_default();
        let preferred_minutes = read_or(prefs.timer_length(), DEFAULT_SESSION_MINUTES, "timer length");

        Self {
            words,
            hints,
            pace,
            gentle_haptics: read_or(prefs.gentle_haptics_enabled(), true, "gentle haptics"),
            typing_sounds: read_or(prefs.typing_sounds_enabled(), false, "typing sounds"),
            session_minutes: session_minutes(preferred_minutes, |id| entitlements.is_purchased(id)),
            ..Self::default()
        }
    }

    /// Carry text and remaining time over from an earlier attempt.
    pub fn resumed(mut self, text: impl Into<String>, seconds_remaining: u32) -> Self {
        self.initial_text = text.into();
        self.initial_seconds_remaining = Some(seconds_remaining);
        self
    }

    pub fn with_hint_seed(mut self, seed: u64) -> Self {
        self.hint_seed = Some(seed);
        self
    }

    /// Replace malformed values with safe defaults.
    pub fn sanitized(mut self) -> Self {
        if self.session_minutes == 0 {
            tracing::warn!(
                session_id = %self.session_id,
                "non-positive session length, using {DEFAULT_SESSION_MINUTES} minutes"
            );
            self.session_minutes = DEFAULT_SESSION_MINUTES;
        }
        self
    }

    pub fn session_seconds(&self) -> u32 {
        self.session_minutes.saturating_mul(60)
    }

    /// Countdown value the clock starts from.
    pub fn starting_seconds(&self) -> u32 {
        self.initial_seconds_remaining
            .unwrap_or_else(|| self.session_seconds())
    }
}

pub(crate) fn read_or<T>(result: Result<T>, default: T, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read {what}, using default");
            default
        }
    }
}

fn or_default<T>(result: Result<Option<T>>, what: &str) -> Option<T> {
    read_or(result, None, what)
}
