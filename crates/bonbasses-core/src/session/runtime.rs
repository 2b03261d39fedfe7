//! Async driver for a writing session.
//!
//! [`SessionHandle`] owns the two periodic tasks a session needs: the
//! one-second countdown ticker and the ten-second autosave. Both are aborted
//! when the attempt ends (check, reset, exit) or the handle is dropped, so no
//! tick or save lands on a finished attempt. `start` brings autosave back.
//!
//! Missed ticks (for example while the process was suspended) are not
//! replayed: the ticker uses [`MissedTickBehavior::Delay`] and simply carries
//! on one second at a time.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::controller::{CheckSubmission, ExitDecision, SessionController, TextUpdate};
use super::snapshot::SessionSnapshot;
use crate::entitlement::{CanvasMode, GateDecision};
use crate::events::Event;
use crate::platform::HapticActuator;
use crate::timer::ClockState;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(10);

/// Running session: a controller plus its scheduled tasks.
///
/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct SessionHandle {
    controller: Arc<Mutex<SessionController>>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
    ticker: Option<JoinHandle<()>>,
    autosave: Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// Take ownership of `controller` and begin autosaving.
    ///
    /// The countdown does not run until [`start`](Self::start).
    pub fn spawn(controller: SessionController) -> Self {
        let snapshot_rx = controller.subscribe();
        let controller = Arc::new(Mutex::new(controller));
        let autosave = Some(spawn_autosave(Arc::clone(&controller)));
        Self {
            controller,
            snapshot_rx,
            ticker: None,
            autosave,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn clock_state(&self) -> ClockState {
        lock(&self.controller).clock_state()
    }

    /// Whether the countdown task is alive.
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Whether the autosave task is alive.
    pub fn is_autosaving(&self) -> bool {
        self.autosave.as_ref().is_some_and(|t| !t.is_finished())
    }

    // ── Clock ────────────────────────────────────────────────────────

    /// Start the countdown, scheduling the one-second ticker and, if it was
    /// stopped, the autosave task.
    pub fn start(&mut self) -> Vec<Event> {
        let (events, running) = {
            let mut ctl = lock(&self.controller);
            let events = ctl.start();
            (events, ctl.clock_state() == ClockState::Running)
        };
        if running {
            if !self.is_ticking() {
                self.ticker = Some(spawn_ticker(Arc::clone(&self.controller)));
            }
            if !self.is_autosaving() {
                self.autosave = Some(spawn_autosave(Arc::clone(&self.controller)));
            }
        }
        events
    }

    pub fn check(&mut self) -> CheckSubmission {
        self.cancel_tasks();
        lock(&self.controller).check()
    }

    pub fn reset(&mut self) {
        self.cancel_tasks();
        lock(&self.controller).reset();
    }

    // ── Editing ──────────────────────────────────────────────────────

    pub fn update_text(&self, new_text: &str) -> TextUpdate {
        lock(&self.controller).update_text(new_text)
    }

    pub fn select_canvas(&self, mode: CanvasMode) -> GateDecision {
        lock(&self.controller).select_canvas(mode)
    }

    // ── Exit ─────────────────────────────────────────────────────────

    pub fn request_exit(&mut self) -> ExitDecision {
        let decision = lock(&self.controller).request_exit();
        if decision == ExitDecision::Exit {
            self.cancel_tasks();
        }
        decision
    }

    pub fn dismiss_exit_prompt(&self) {
        lock(&self.controller).dismiss_exit_prompt();
    }

    pub fn confirm_exit(&mut self) -> ExitDecision {
        self.cancel_tasks();
        lock(&self.controller).confirm_exit()
    }

    // ── One-shot signals ─────────────────────────────────────────────

    pub fn acknowledge_hint(&self) {
        lock(&self.controller).acknowledge_hint();
    }

    pub fn acknowledge_haptic(&self) {
        lock(&self.controller).acknowledge_haptic();
    }

    pub fn acknowledge_time_up(&self) {
        lock(&self.controller).acknowledge_time_up();
    }

    pub fn dismiss_paywall(&self) {
        lock(&self.controller).dismiss_paywall();
    }

    pub fn deliver_haptic(&self, actuator: &dyn HapticActuator) -> bool {
        lock(&self.controller).deliver_haptic(actuator)
    }

    /// Save now instead of waiting for the next autosave round.
    pub fn autosave(&self) -> bool {
        lock(&self.controller).autosave()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn cancel_tasks(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        if let Some(autosave) = self.autosave.take() {
            autosave.abort();
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.cancel_tasks();
    }
}

// All controller operations are total, so a panic elsewhere cannot leave it
// half-updated; a poisoned lock is still usable.
fn lock(controller: &Mutex<SessionController>) -> MutexGuard<'_, SessionController> {
    controller.lock().unwrap_or_else(|e| e.into_inner())
}

fn spawn_ticker(controller: Arc<Mutex<SessionController>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let running = {
                let mut ctl = lock(&controller);
                ctl.tick();
                ctl.clock_state() == ClockState::Running
            };
            if !running {
                tracing::debug!("countdown finished, ticker exiting");
                break;
            }
        }
    })
}

fn spawn_autosave(controller: Arc<Mutex<SessionController>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval_at(Instant::now() + AUTOSAVE_INTERVAL, AUTOSAVE_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            lock(&controller).autosave();
        }
    })
}
