//! Background persistence of the canvas choice.
//!
//! Writes run in order on a dedicated thread fed by an unbounded channel, so
//! `select_canvas` never waits on the preference store. The thread drains
//! queued writes and exits once the owning controller is dropped.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::entitlement::CanvasMode;
use crate::platform::PreferencesStore;

pub(crate) struct CanvasWriter {
    // `None` when the writer thread could not be started; writes then run inline.
    tx: Option<mpsc::UnboundedSender<CanvasMode>>,
    preferences: Arc<dyn PreferencesStore>,
}

impl CanvasWriter {
    pub(crate) fn spawn(preferences: Arc<dyn PreferencesStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<CanvasMode>();
        let store = Arc::clone(&preferences);

        let spawned = std::thread::Builder::new()
            .name("bonbasses-canvas-writer".into())
            .spawn(move || {
                while let Some(mode) = rx.blocking_recv() {
                    persist(store.as_ref(), mode);
                }
                tracing::debug!("canvas writer closed");
            });

        let tx = match spawned {
            Ok(_) => Some(tx),
            Err(e) => {
                tracing::warn!(error = %e, "failed to start canvas writer, writing inline");
                None
            }
        };
        Self { tx, preferences }
    }

    /// Queue `mode` for persistence. Returns immediately.
    pub(crate) fn write(&self, mode: CanvasMode) {
        let Some(tx) = &self.tx else {
            persist(self.preferences.as_ref(), mode);
            return;
        };
        if let Err(mpsc::error::SendError(mode)) = tx.send(mode) {
            persist(self.preferences.as_ref(), mode);
        }
    }
}

impl std::fmt::Debug for CanvasWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasWriter")
            .field("threaded", &self.tx.is_some())
            .finish_non_exhaustive()
    }
}

fn persist(store: &dyn PreferencesStore, mode: CanvasMode) {
    match store.set_selected_canvas(mode.as_str()) {
        Ok(()) => tracing::debug!(canvas = mode.as_str(), "canvas choice saved"),
        Err(e) => tracing::warn!(error = %e, canvas = mode.as_str(), "failed to save canvas choice"),
    }
}
