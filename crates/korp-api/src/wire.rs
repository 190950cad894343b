//! Request and reply bodies for the backend endpoints.

use serde::{Deserialize, Serialize};

use korp_core::{CountsByLabel, Label, StatusSummary, TrainingExample};

/// Endpoint paths, relative to the configured base URL.
pub mod paths {
    pub const LOGIN: &str = "/admin_login";
    pub const DATA_STATUS: &str = "/get_data_status";
    pub const ADD_DATA: &str = "/add_data";
    pub const DELETE_DATA: &str = "/delete_data";
    pub const RETRAIN: &str = "/retrain_model";
    pub const STATS: &str = "/get_stats";
    pub const PREDICT: &str = "/predict";
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub data: Option<Vec<TrainingExample>>,
    #[serde(default)]
    pub word_counts: Option<CountsByLabel>,
}

#[derive(Debug, Serialize)]
pub struct AddRequest<'a> {
    pub text: &'a str,
    pub label: Label,
}

#[derive(Debug, Serialize)]
pub struct TextRequest<'a> {
    pub text: &'a str,
}

/// Generic acknowledgment reply (`{message}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageReply {
    #[serde(default)]
    pub message: String,
}

/// Authoritative corpus listing from `/get_data_status`.
#[derive(Debug, Clone, Deserialize)]
pub struct DataStatusReply {
    pub data: Vec<TrainingExample>,
    #[serde(default)]
    pub stats: Option<StatusSummary>,
    /// Older backends put the counts at the top level.
    #[serde(default)]
    pub word_counts: Option<CountsByLabel>,
}

impl DataStatusReply {
    /// Merge the top-level `word_counts` into the summary when the backend
    /// sent no `stats` object.
    #[must_use]
    pub fn summary(&self) -> Option<StatusSummary> {
        match (&self.stats, self.word_counts) {
            (Some(stats), _) => Some(stats.clone()),
            (None, Some(word_counts)) => Some(StatusSummary {
                word_counts: Some(word_counts),
                ..StatusSummary::default()
            }),
            (None, None) => None,
        }
    }
}
