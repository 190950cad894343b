//! # korp-corpus
//!
//! Operator-side state for korpus.
//!
//! - [`CorpusStore`]: local mirror of the server corpus, changed only after
//!   the server acknowledges an add or delete
//! - [`RetrainCoordinator`]: fire-and-forget retrain with delayed
//!   reconciliation against the corpus listing
//! - [`StatsCache`]: last fetched statistics snapshot
//! - [`Console`]: dispatches operator [`Intent`]s to the above

pub mod console;
pub mod error;
pub mod retrain;
pub mod stats;
pub mod store;

pub use console::{Console, ConsoleStatus, Intent, Outcome};
pub use error::CorpusError;
pub use retrain::{ReconcilePolicy, ReconcileReport, RetrainCoordinator, RetrainReceipt};
pub use stats::{CachedStats, StatsCache};
pub use store::{CorpusStore, MutationAck};
