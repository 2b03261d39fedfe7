use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::SessionConfig;
use crate::entitlement::CanvasMode;
use crate::text::measure;

/// Live state of a writing session, replaced whole on every change.
///
/// `pending_*` fields are one-shot signals: they stay set until the consumer
/// acknowledges them, and a newer signal of the same kind overwrites an
/// unacknowledged one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub words: Vec<String>,
    pub story_text: String,
    pub char_count: usize,
    pub word_count: usize,
    pub seconds_remaining: u32,
    pub canvas: CanvasMode,
    pub timer_running: bool,
    /// Clock stopped because the user submitted.
    pub checking: bool,
    pub has_unsaved_changes: bool,
    pub pending_hint: Option<String>,
    pub pending_time_up: bool,
    /// Product id the user must buy for the canvas they picked.
    pub pending_paywall: Option<String>,
    pub pending_haptic: bool,
    /// Leaving would discard a non-blank story.
    pub pending_exit_confirmation: bool,
}

impl SessionSnapshot {
    pub fn from_config(config: &SessionConfig, canvas: CanvasMode) -> Self {
        let metrics = measure(&config.initial_text);
        Self {
            session_id: config.session_id,
            words: config.words.clone(),
            story_text: config.initial_text.clone(),
            char_count: metrics.char_count,
            word_count: metrics.word_count,
            seconds_remaining: config.starting_seconds(),
            canvas,
            timer_running: false,
            checking: false,
            has_unsaved_changes: false,
            pending_hint: None,
            pending_time_up: false,
            pending_paywall: None,
            pending_haptic: false,
            pending_exit_confirmation: false,
        }
    }

    /// Replace the story text and keep the counts in step with it.
    pub(crate) fn set_text(&mut self, text: String) {
        let metrics = measure(&text);
        self.story_text = text;
        self.char_count = metrics.char_count;
        self.word_count = metrics.word_count;
    }

    pub(crate) fn clear_signals(&mut self) {
        self.pending_hint = None;
        self.pending_time_up = false;
        self.pending_paywall = None;
        self.pending_haptic = false;
        self.pending_exit_confirmation = false;
    }
}
