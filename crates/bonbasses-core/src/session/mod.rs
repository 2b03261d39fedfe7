//! One writing attempt: configuration, live snapshot, the synchronous
//! controller, and the async runtime that drives it.

mod config;
mod controller;
mod runtime;
mod snapshot;
mod writer;

pub use config::SessionConfig;
pub use controller::{
    CheckSubmission, Collaborators, ExitDecision, SessionController, TextUpdate, MAX_STORY_CHARS,
};
pub use runtime::{SessionHandle, AUTOSAVE_INTERVAL, TICK_INTERVAL};
pub use snapshot::SessionSnapshot;
