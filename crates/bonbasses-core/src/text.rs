//! Text metrics for the story being written.

use serde::{Deserialize, Serialize};

/// Character and word counts derived from a story text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextMetrics {
    pub char_count: usize,
    pub word_count: usize,
}

/// Measure `text`.
///
/// Characters are Unicode scalar values. Words are maximal runs of
/// non-whitespace; a blank text has zero words.
pub fn measure(text: &str) -> TextMetrics {
    TextMetrics {
        char_count: text.chars().count(),
        word_count: text.split_whitespace().count(),
    }
}

/// Format seconds as `MM:SS` for the countdown display.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
