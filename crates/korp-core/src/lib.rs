//! # korp-core
//!
//! Core types and error types for korpus.
//!
//! This crate provides the foundational types shared across all korpus crates:
//! - The training label and session status enums
//! - Entity structs for corpus entries, statistics snapshots and predictions
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;

pub use entities::{
    AveragesByLabel, CorpusCounts, CountsByLabel, LabelStats, Prediction, StatsSnapshot,
    StatusSummary, TrainingExample, WordCount, WordsByLabel,
};
pub use enums::{Label, SessionStatus};
pub use errors::CoreError;
