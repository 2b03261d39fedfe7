//! # Bonbasses Core Library
//!
//! Core logic for the timed writing session: the user gets a handful of
//! prompt words and a few minutes to write a short story around them.
//!
//! ## Architecture
//!
//! - **Session Clock**: A caller-driven countdown state machine. The caller
//!   invokes `tick()` once per second; pace-dependent hint and haptic marks
//!   come back as events
//! - **Session Controller**: Owns the clock and the live [`SessionSnapshot`],
//!   enforces the story length limit and the canvas paywall
//! - **Session Runtime**: tokio tasks for the one-second ticker and autosave
//! - **Storage**: TOML-based preferences (quiz answers, canvas, toggles)
//!
//! ## Key Components
//!
//! - [`SessionClock`]: Countdown state machine
//! - [`SessionController`]: Per-attempt operations and snapshot publishing
//! - [`SessionHandle`]: Async driver with ticker and autosave
//! - [`HintRotation`]: No-repeat random hint picker
//! - [`can_apply`]: Canvas entitlement gate

pub mod entitlement;
pub mod error;
pub mod events;
pub mod hints;
pub mod platform;
pub mod session;
pub mod storage;
pub mod text;
pub mod timer;

pub use entitlement::{can_apply, session_minutes, CanvasMode, GateDecision, CANVAS_PACK, TIMER_10_MIN};
pub use error::{CoreError, PreferencesError};
pub use events::Event;
pub use hints::{load_hints, HintRotation};
pub use platform::{
    Draft, DraftSink, EntitlementService, HapticActuator, PreferencesStore, PurchaseLedger,
    SoundActuator,
};
pub use session::{
    CheckSubmission, Collaborators, ExitDecision, SessionConfig, SessionController, SessionHandle,
    SessionSnapshot, TextUpdate, MAX_STORY_CHARS,
};
pub use storage::{FilePreferences, MemoryPreferences, Preferences};
pub use text::{format_clock, measure, TextMetrics};
pub use timer::{ClockState, Pace, SessionClock};
