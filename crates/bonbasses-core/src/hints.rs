//! Timer hints shown mid-session.
//!
//! Hints rotate without repetition: every hint is shown once before any
//! hint is shown again.

use std::collections::HashSet;

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

/// Bundled hint content: `{"hints": ["...", ...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerHintsData {
    #[serde(default)]
    pub hints: Vec<String>,
}

/// Parse bundled hint content.
///
/// A blank or malformed document yields no hints; the session then simply
/// runs without them.
pub fn load_hints(json: &str) -> Vec<String> {
    if json.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<TimerHintsData>(json) {
        Ok(data) => data
            .hints
            .into_iter()
            .filter(|h| !h.trim().is_empty())
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "timer hints unavailable, continuing without hints");
            Vec::new()
        }
    }
}

/// Non-repeating random hint picker.
#[derive(Debug, Clone)]
pub struct HintRotation {
    hints: Vec<String>,
    shown: HashSet<usize>,
    rng: Mcg128Xsl64,
}

impl HintRotation {
    pub fn new(hints: Vec<String>) -> Self {
        Self {
            hints,
            shown: HashSet::new(),
            rng: Mcg128Xsl64::from_entropy(),
        }
    }

    /// Deterministic rotation for reproducible sessions and tests.
    pub fn with_seed(hints: Vec<String>, seed: u64) -> Self {
        Self {
            hints,
            shown: HashSet::new(),
            rng: Mcg128Xsl64::seed_from_u64(seed),
        }
    }

    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    /// Number of hints shown in the current rotation.
    pub fn shown_count(&self) -> usize {
        self.shown.len()
    }

    /// Next hint, or an empty string when there are no hints at all.
    pub fn next(&mut self) -> String {
        if self.hints.is_empty() {
            return String::new();
        }
        if self.shown.len() >= self.hints.len() {
            self.shown.clear();
        }

        let available: Vec<usize> = (0..self.hints.len())
            .filter(|i| !self.shown.contains(i))
            .collect();
        let Some(&index) = available.choose(&mut self.rng) else {
            return String::new();
        };
        self.shown.insert(index);
        self.hints[index].clone()
    }

    /// Forget which hints were shown.
    pub fn reset(&mut self) {
        self.shown.clear();
    }
}
