//! Premium feature gating.
//!
//! Decisions here are pure: they ask "is this product owned?" and never start
//! a purchase. A failed or cancelled purchase simply leaves the product
//! unowned.

use serde::{Deserialize, Serialize};

/// Product id unlocking the Typewriter and Focus canvases.
pub const CANVAS_PACK: &str = "com.bonbasses.canvaspack";
/// Product id unlocking 10-minute sessions.
pub const TIMER_10_MIN: &str = "com.bonbasses.timer10";

pub const DEFAULT_SESSION_MINUTES: u32 = 7;
pub const EXTENDED_SESSION_MINUTES: u32 = 10;

/// Visual style of the writing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CanvasMode {
    #[default]
    Classic,
    Typewriter,
    Focus,
}

impl CanvasMode {
    /// Name stored in preferences.
    pub fn as_str(self) -> &'static str {
        match self {
            CanvasMode::Classic => "CLASSIC",
            CanvasMode::Typewriter => "TYPEWRITER",
            CanvasMode::Focus => "FOCUS",
        }
    }

    /// Parse a stored name. Only exact stored names match; anything else is
    /// `Classic`.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "TYPEWRITER" => CanvasMode::Typewriter,
            "FOCUS" => CanvasMode::Focus,
            _ => CanvasMode::Classic,
        }
    }

    /// Product that must be owned to use this mode, if any.
    pub fn product_id(self) -> Option<&'static str> {
        match self {
            CanvasMode::Classic => None,
            CanvasMode::Typewriter | CanvasMode::Focus => Some(CANVAS_PACK),
        }
    }
}

/// Outcome of an entitlement check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "product_id", rename_all = "snake_case")]
pub enum GateDecision {
    Allowed,
    NeedsPurchase(String),
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allowed)
    }
}

/// Decide whether `mode` may be applied given the live purchase state.
pub fn can_apply<F>(mode: CanvasMode, is_entitled: F) -> GateDecision
where
    F: Fn(&str) -> bool,
{
    match mode.product_id() {
        Some(product) if !is_entitled(product) => GateDecision::NeedsPurchase(product.to_string()),
        _ => GateDecision::Allowed,
    }
}

/// Effective session length for a preferred timer length.
///
/// Only 7 and 10 minutes are offered; 10 requires [`TIMER_10_MIN`]. Anything
/// else falls back to the 7-minute default.
pub fn session_minutes<F>(preferred: u32, is_entitled: F) -> u32
where
    F: Fn(&str) -> bool,
{
    if preferred == EXTENDED_SESSION_MINUTES && is_entitled(TIMER_10_MIN) {
        EXTENDED_SESSION_MINUTES
    } else {
        DEFAULT_SESSION_MINUTES
    }
}
