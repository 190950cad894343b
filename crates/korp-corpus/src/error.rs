//! Corpus-level error types.

use korp_api::ApiError;
use korp_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    /// The backend call failed; see [`ApiError`] for the failure class.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Input rejected before anything was sent.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// `remove` was asked for a text the local corpus does not hold.
    #[error("no example with text '{0}' in the local corpus")]
    UnknownExample(String),

    /// The background reconciliation task did not run to completion.
    #[error("reconciliation task failed: {0}")]
    Reconcile(String),
}

impl CorpusError {
    /// The operator has to log in again before retrying.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Api(error) if error.is_auth_failure())
    }

    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Api(error) if error.is_transport())
    }
}
