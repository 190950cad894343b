pub mod auth;
pub mod corpus;
pub mod dispatch;
pub mod predict;
pub mod retrain;
pub mod stats;

use korp_corpus::{Console, CorpusError, Intent, Outcome};

/// Whether a failed command should be retried after `korp auth login`.
pub fn needs_login(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<CorpusError>())
        .any(CorpusError::requires_login)
}

/// Load the authoritative corpus before commands that read it.
async fn refreshed(console: &Console) -> anyhow::Result<Vec<korp_core::TrainingExample>> {
    match console.dispatch(Intent::Refresh).await? {
        Outcome::Corpus(examples) => Ok(examples),
        other => anyhow::bail!("unexpected outcome for refresh: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Context;
    use korp_api::ApiError;

    use super::*;

    #[test]
    fn expired_session_needs_login_through_context() {
        let error = Err::<(), _>(CorpusError::from(ApiError::SessionExpired))
            .context("corpus add failed")
            .unwrap_err();
        assert!(needs_login(&error));
    }

    #[test]
    fn other_failures_do_not() {
        let error = anyhow::Error::from(CorpusError::UnknownExample("x".into()));
        assert!(!needs_login(&error));
        assert!(!needs_login(&anyhow::anyhow!("plain")));
    }
}
