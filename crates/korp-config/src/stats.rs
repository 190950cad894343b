//! Statistics display configuration.

use serde::{Deserialize, Serialize};

const fn default_top_n() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatsConfig {
    /// How many frequent words to show per list.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}
