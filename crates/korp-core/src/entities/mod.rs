//! Entity structs for korpus domain objects.
//!
//! All structs derive `Serialize` and `Deserialize` using the backend's JSON
//! field names, so the same types serve as wire DTOs and CLI output.

mod counts;
mod example;
mod prediction;
mod stats;

pub use counts::CorpusCounts;
pub use example::TrainingExample;
pub use prediction::Prediction;
pub use stats::{
    AveragesByLabel, CountsByLabel, LabelStats, StatsSnapshot, StatusSummary, WordCount,
    WordsByLabel,
};
