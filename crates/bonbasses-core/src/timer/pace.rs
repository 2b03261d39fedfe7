use serde::{Deserialize, Serialize};

/// Declared writing pace from the onboarding quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Fast,
    #[default]
    Steady,
    Unhurried,
}

impl Pace {
    /// Parse a quiz answer. Only the exact quiz options `"Fast"` and
    /// `"Unhurried"` match; anything else (including an empty answer) is
    /// `Steady`.
    pub fn from_answer(answer: &str) -> Self {
        match answer {
            "Fast" => Pace::Fast,
            "Unhurried" => Pace::Unhurried,
            _ => Pace::Steady,
        }
    }

    /// Seconds-remaining thresholds at which a hint is shown.
    pub fn hint_offsets(self) -> (u32, u32) {
        match self {
            Pace::Fast => (420, 210),
            Pace::Unhurried => (300, 30),
            Pace::Steady => (420, 60),
        }
    }

    pub fn is_hint_offset(self, seconds_remaining: u32) -> bool {
        let (first, second) = self.hint_offsets();
        seconds_remaining == first || seconds_remaining == second
    }
}

/// Hint offsets for a raw quiz answer.
pub fn hint_offsets_for(answer: &str) -> (u32, u32) {
    Pace::from_answer(answer).hint_offsets()
}
