//! Collaborator contracts the session engine calls into.
//!
//! Hosts implement these over their platform services. Every method is
//! expected to return quickly; the engine never awaits a collaborator.

use std::collections::HashSet;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entitlement::CanvasMode;
use crate::error::Result;

/// Quiz question whose answer holds the declared writing pace.
pub const PACE_QUESTION_ID: u32 = 1;

/// User preferences written by the quiz and the settings screen.
///
/// Read failures are not fatal: the engine substitutes defaults.
pub trait PreferencesStore: Send + Sync {
    fn answer(&self, question_id: u32) -> Result<Option<String>>;

    fn gentle_haptics_enabled(&self) -> Result<bool>;

    fn typing_sounds_enabled(&self) -> Result<bool>;

    /// Stored canvas name (`"CLASSIC"`, `"TYPEWRITER"`, `"FOCUS"`).
    fn selected_canvas(&self) -> Result<String>;

    fn set_selected_canvas(&self, canvas: &str) -> Result<()>;

    /// Preferred session length in minutes.
    fn timer_length(&self) -> Result<u32>;
}

/// Point-in-time purchase state.
pub trait EntitlementService: Send + Sync {
    fn is_purchased(&self, product_id: &str) -> bool;
}

impl<F> EntitlementService for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_purchased(&self, product_id: &str) -> bool {
        self(product_id)
    }
}

/// Owned products, updated by the out-of-band purchase flow.
#[derive(Debug, Default)]
pub struct PurchaseLedger {
    owned: RwLock<HashSet<String>>,
}

impl PurchaseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful purchase or restore.
    pub fn record_purchase(&self, product_id: &str) {
        let mut owned = self.owned.write().unwrap_or_else(|e| e.into_inner());
        owned.insert(product_id.to_string());
    }

    /// Drop an entitlement (refund, revoked restore).
    pub fn revoke(&self, product_id: &str) {
        let mut owned = self.owned.write().unwrap_or_else(|e| e.into_inner());
        owned.remove(product_id);
    }
}

impl EntitlementService for PurchaseLedger {
    fn is_purchased(&self, product_id: &str) -> bool {
        let owned = self.owned.read().unwrap_or_else(|e| e.into_inner());
        owned.contains(product_id)
    }
}

/// Device vibration. Fire-and-forget.
pub trait HapticActuator: Send + Sync {
    fn trigger(&self);
}

/// Keyboard click feedback. Fire-and-forget.
pub trait SoundActuator: Send + Sync {
    fn play_typing_sound(&self);
}

/// Actuator for hosts without haptics or sound.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopActuator;

impl HapticActuator for NoopActuator {
    fn trigger(&self) {}
}

impl SoundActuator for NoopActuator {
    fn play_typing_sound(&self) {}
}

/// Autosaved copy of an in-progress story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub session_id: Uuid,
    pub words: Vec<String>,
    pub story_text: String,
    pub seconds_remaining: u32,
    pub canvas: CanvasMode,
    pub saved_at: DateTime<Utc>,
}

/// Destination for autosaved drafts.
pub trait DraftSink: Send + Sync {
    fn save_draft(&self, draft: &Draft) -> Result<()>;
}

/// Sink that accepts every draft and stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDraftSink;

impl DraftSink for NoopDraftSink {
    fn save_draft(&self, _draft: &Draft) -> Result<()> {
        Ok(())
    }
}
