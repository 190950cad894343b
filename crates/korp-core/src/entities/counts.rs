use serde::{Deserialize, Serialize};

use crate::entities::TrainingExample;
use crate::enums::Label;

/// Per-predicate counts over an in-memory corpus.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorpusCounts {
    pub human: usize,
    pub ai: usize,
    pub untrained: usize,
    pub total: usize,
}

impl CorpusCounts {
    #[must_use]
    pub fn from_examples(examples: &[TrainingExample]) -> Self {
        examples.iter().fold(Self::default(), |mut counts, example| {
            match example.label {
                Label::Human => counts.human += 1,
                Label::Ai => counts.ai += 1,
            }
            if !example.trained {
                counts.untrained += 1;
            }
            counts.total += 1;
            counts
        })
    }
}
