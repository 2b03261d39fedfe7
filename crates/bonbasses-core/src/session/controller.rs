//! Per-attempt session controller.
//!
//! Glues the clock, hint rotation, entitlement gate and text metrics into the
//! operations the writing screen calls. It is the only writer of the
//! [`SessionSnapshot`]; every operation publishes one whole new snapshot.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::config::{read_or, SessionConfig};
use super::snapshot::SessionSnapshot;
use super::writer::CanvasWriter;
use crate::entitlement::{can_apply, CanvasMode, GateDecision};
use crate::events::Event;
use crate::hints::HintRotation;
use crate::platform::{
    Draft, DraftSink, EntitlementService, HapticActuator, NoopActuator, NoopDraftSink,
    PreferencesStore, SoundActuator,
};
use crate::timer::{ClockState, SessionClock};

/// Longest story accepted, in characters.
pub const MAX_STORY_CHARS: usize = 1000;

/// External services a session talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub preferences: Arc<dyn PreferencesStore>,
    pub entitlements: Arc<dyn EntitlementService>,
    pub sound: Arc<dyn SoundActuator>,
    pub drafts: Arc<dyn DraftSink>,
}

impl Collaborators {
    /// Silent sound and no draft persistence.
    pub fn new(
        preferences: Arc<dyn PreferencesStore>,
        entitlements: Arc<dyn EntitlementService>,
    ) -> Self {
        Self {
            preferences,
            entitlements,
            sound: Arc::new(NoopActuator),
            drafts: Arc::new(NoopDraftSink),
        }
    }

    pub fn with_sound(mut self, sound: Arc<dyn SoundActuator>) -> Self {
        self.sound = sound;
        self
    }

    pub fn with_drafts(mut self, drafts: Arc<dyn DraftSink>) -> Self {
        self.drafts = drafts;
        self
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextUpdate {
    Accepted,
    /// Over [`MAX_STORY_CHARS`]; nothing changed.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitDecision {
    /// Story is non-blank; the screen should ask before leaving.
    ConfirmationRequired,
    /// Session was reset; leaving is safe.
    Exit,
}

/// What the scoring step receives when the user checks their story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSubmission {
    pub words: Vec<String>,
    pub story_text: String,
    pub char_count: usize,
    pub word_count: usize,
    pub seconds_remaining: u32,
}

#[derive(Debug)]
pub struct SessionController {
    config: SessionConfig,
    clock: SessionClock,
    collaborators: Collaborators,
    canvas_writer: CanvasWriter,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl SessionController {
    pub fn new(config: SessionConfig, collaborators: Collaborators) -> Self {
        let config = config.sanitized();
        let rotation = match config.hint_seed {
            Some(seed) => HintRotation::with_seed(config.hints.clone(), seed),
            None => HintRotation::new(config.hints.clone()),
        };
        let clock = SessionClock::new(
            config.starting_seconds(),
            config.session_minutes,
            config.pace,
            config.gentle_haptics,
            rotation,
        );

        let canvas = saved_canvas(&collaborators);
        let canvas_writer = CanvasWriter::spawn(Arc::clone(&collaborators.preferences));
        let (snapshot_tx, _) = watch::channel(SessionSnapshot::from_config(&config, canvas));

        tracing::info!(
            session_id = %config.session_id,
            seconds = config.starting_seconds(),
            pace = ?config.pace,
            hints = config.hints.len(),
            "writing session created"
        );

        Self {
            config,
            clock,
            collaborators,
            canvas_writer,
            snapshot_tx,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn clock_state(&self) -> ClockState {
        self.clock.state()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Observe every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    // ── Clock ────────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        let events = self.clock.start();
        self.apply(&events);
        events
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> Vec<Event> {
        let events = self.clock.tick();
        if !events.is_empty() {
            self.apply(&events);
        }
        events
    }

    /// Stop the clock and hand the story to scoring.
    pub fn check(&mut self) -> CheckSubmission {
        let event = self.clock.stop_for_check();
        self.apply(event.as_slice());
        self.publish(|snap| snap.checking = true);

        let snap = self.snapshot();
        tracing::info!(
            session_id = %self.config.session_id,
            chars = snap.char_count,
            seconds_remaining = snap.seconds_remaining,
            "story submitted for checking"
        );
        CheckSubmission {
            words: snap.words,
            story_text: snap.story_text,
            char_count: snap.char_count,
            word_count: snap.word_count,
            seconds_remaining: snap.seconds_remaining,
        }
    }

    /// Back to a fresh, idle attempt with the same prompt words.
    pub fn reset(&mut self) {
        let event = self.clock.reset();
        tracing::debug!(session_id = %self.config.session_id, ?event, "session reset");
        let seconds = self.clock.seconds_remaining();
        self.publish(|snap| {
            snap.set_text(String::new());
            snap.seconds_remaining = seconds;
            snap.timer_running = false;
            snap.checking = false;
            snap.has_unsaved_changes = false;
            snap.clear_signals();
        });
    }

    // ── Editing ──────────────────────────────────────────────────────

    pub fn update_text(&mut self, new_text: &str) -> TextUpdate {
        let new_len = new_text.chars().count();
        if new_len > MAX_STORY_CHARS {
            tracing::debug!(len = new_len, "text over limit rejected");
            return TextUpdate::Rejected;
        }

        let previous_len = self.snapshot_tx.borrow().char_count;
        if new_len > previous_len && self.config.typing_sounds {
            self.collaborators.sound.play_typing_sound();
        }

        self.publish(|snap| {
            snap.set_text(new_text.to_string());
            snap.has_unsaved_changes = true;
        });
        TextUpdate::Accepted
    }

    /// Switch canvas, or raise the paywall if the canvas is locked.
    ///
    /// The choice is persisted in the background; this never waits on the
    /// preference store.
    pub fn select_canvas(&mut self, mode: CanvasMode) -> GateDecision {
        let entitlements = Arc::clone(&self.collaborators.entitlements);
        let decision = can_apply(mode, |id| entitlements.is_purchased(id));

        match &decision {
            GateDecision::Allowed => {
                self.publish(|snap| snap.canvas = mode);
                self.canvas_writer.write(mode);
                tracing::debug!(canvas = mode.as_str(), "canvas changed");
            }
            GateDecision::NeedsPurchase(product_id) => {
                tracing::debug!(product_id = %product_id, canvas = mode.as_str(), "canvas locked");
                let product_id = product_id.clone();
                self.publish(|snap| snap.pending_paywall = Some(product_id));
            }
        }
        decision
    }

    // ── Exit ─────────────────────────────────────────────────────────

    /// Leave the writing screen, unless that would drop a story.
    pub fn request_exit(&mut self) -> ExitDecision {
        if !self.snapshot_tx.borrow().story_text.trim().is_empty() {
            self.publish(|snap| snap.pending_exit_confirmation = true);
            return ExitDecision::ConfirmationRequired;
        }
        self.reset();
        ExitDecision::Exit
    }

    pub fn dismiss_exit_prompt(&mut self) {
        self.publish(|snap| snap.pending_exit_confirmation = false);
    }

    /// User confirmed leaving despite a non-blank story.
    pub fn confirm_exit(&mut self) -> ExitDecision {
        self.reset();
        ExitDecision::Exit
    }

    // ── One-shot signals ─────────────────────────────────────────────

    pub fn acknowledge_hint(&mut self) {
        self.publish(|snap| snap.pending_hint = None);
    }

    pub fn acknowledge_haptic(&mut self) {
        self.publish(|snap| snap.pending_haptic = false);
    }

    pub fn acknowledge_time_up(&mut self) {
        self.publish(|snap| snap.pending_time_up = false);
    }

    pub fn dismiss_paywall(&mut self) {
        self.publish(|snap| snap.pending_paywall = None);
    }

    /// Fire a pending haptic on `actuator` and acknowledge it.
    pub fn deliver_haptic(&mut self, actuator: &dyn HapticActuator) -> bool {
        if !self.snapshot_tx.borrow().pending_haptic {
            return false;
        }
        actuator.trigger();
        self.acknowledge_haptic();
        true
    }

    // ── Autosave ─────────────────────────────────────────────────────

    /// Save a draft if there are unsaved changes. Returns whether one was saved.
    ///
    /// A failed save keeps the unsaved flag so the next round retries.
    pub fn autosave(&mut self) -> bool {
        let snap = self.snapshot();
        if !snap.has_unsaved_changes {
            return false;
        }

        let draft = Draft {
            session_id: snap.session_id,
            words: snap.words,
            story_text: snap.story_text,
            seconds_remaining: snap.seconds_remaining,
            canvas: snap.canvas,
            saved_at: Utc::now(),
        };
        match self.collaborators.drafts.save_draft(&draft) {
            Ok(()) => {
                self.publish(|snap| snap.has_unsaved_changes = false);
                tracing::debug!(session_id = %draft.session_id, "draft autosaved");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, session_id = %draft.session_id, "autosave failed");
                false
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Publish a modified copy of the current snapshot.
    fn publish<F>(&self, f: F)
    where
        F: FnOnce(&mut SessionSnapshot),
    {
        let mut next = self.snapshot_tx.borrow().clone();
        f(&mut next);
        self.snapshot_tx.send_replace(next);
    }

    fn apply(&self, events: &[Event]) {
        let seconds = self.clock.seconds_remaining();
        let running = self.clock.is_running();
        self.publish(|snap| {
            snap.seconds_remaining = seconds;
            snap.timer_running = running;
            if running {
                snap.checking = false;
            }
            for event in events {
                match event {
                    Event::HintPublished { hint, .. } => snap.pending_hint = Some(hint.clone()),
                    Event::HapticRequested { .. } => snap.pending_haptic = true,
                    Event::TimeUp { .. } => snap.pending_time_up = true,
                    _ => {}
                }
            }
        });
        for event in events {
            match event {
                Event::ClockTicked { .. } => {}
                Event::TimeUp { .. } => {
                    tracing::info!(session_id = %self.config.session_id, "time is up")
                }
                other => tracing::debug!(session_id = %self.config.session_id, event = ?other),
            }
        }
    }
}

/// Canvas saved from an earlier session, if still owned.
fn saved_canvas(collaborators: &Collaborators) -> CanvasMode {
    let stored = read_or(
        collaborators.preferences.selected_canvas(),
        CanvasMode::Classic.as_str().to_string(),
        "selected canvas",
    );
    let mode = CanvasMode::from_stored(&stored);
    let entitlements = &collaborators.entitlements;
    if can_apply(mode, |id| entitlements.is_purchased(id)).is_allowed() {
        mode
    } else {
        CanvasMode::Classic
    }
}
