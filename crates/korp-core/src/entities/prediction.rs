use serde::{Deserialize, Serialize};

use crate::enums::Label;

/// Classifier output in percent. The scores are not guaranteed to sum to
/// exactly 100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    #[serde(rename = "menschlich")]
    pub human: f64,
    #[serde(rename = "ki")]
    pub ai: f64,
}

impl Prediction {
    /// `Ai` iff the AI score is strictly greater; ties go to `Human`.
    #[must_use]
    pub fn verdict(&self) -> Label {
        if self.ai > self.human {
            Label::Ai
        } else {
            Label::Human
        }
    }

    /// Score of the winning label.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        match self.verdict() {
            Label::Human => self.human,
            Label::Ai => self.ai,
        }
    }
}
