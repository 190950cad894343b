use serde::{Deserialize, Serialize};

use crate::enums::Label;

/// One labeled text in the training corpus. `text` is the identity key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingExample {
    pub text: String,
    pub label: Label,
    /// `false` until an authoritative refresh after a retrain reports the
    /// example as incorporated into the current model.
    #[serde(default)]
    pub trained: bool,
}

impl TrainingExample {
    /// An example the server has accepted but not yet trained on.
    #[must_use]
    pub fn pending(text: impl Into<String>, label: Label) -> Self {
        Self {
            text: text.into(),
            label,
            trained: false,
        }
    }
}
