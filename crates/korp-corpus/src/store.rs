//! Local mirror of the server-held training corpus.
//!
//! The server is authoritative. Mutations are acknowledgment-gated: the local
//! corpus changes only after the server accepted the add or delete, then a
//! fresh listing is fetched to re-verify. A failed call never leaves a
//! partial change behind. Concurrent mutations are not serialized; whichever
//! acknowledgment arrives last determines the local state.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use korp_api::wire::{AddRequest, DataStatusReply, MessageReply, TextRequest, paths};
use korp_api::{Method, Session};
use korp_core::errors::require_text;
use korp_core::{CorpusCounts, Label, StatusSummary, TrainingExample};

use crate::error::CorpusError;

/// Server acknowledgment of an add or remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationAck {
    /// Server message, verbatim.
    pub message: String,
    /// Whether the follow-up authoritative fetch succeeded.
    pub verified: bool,
}

#[derive(Debug, Default)]
struct CorpusState {
    examples: Vec<TrainingExample>,
    summary: Option<StatusSummary>,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Shared handle to the corpus mirror. Clones see the same corpus.
#[derive(Debug, Clone)]
pub struct CorpusStore {
    session: Session,
    state: Arc<RwLock<CorpusState>>,
}

impl CorpusStore {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            state: Arc::default(),
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Replace the local corpus with the server's listing.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Api`] on transport, application or
    /// authorization failure; the previous corpus is kept as it was.
    pub async fn refresh(&self) -> Result<Vec<TrainingExample>, CorpusError> {
        let reply: DataStatusReply = self
            .session
            .authorized_request::<(), _>(Method::GET, paths::DATA_STATUS, None)
            .await?;

        let summary = reply.summary();
        let examples = reply.data;
        let mut state = self.write();
        state.examples.clone_from(&examples);
        state.summary = summary;
        state.refreshed_at = Some(Utc::now());
        drop(state);

        tracing::info!(count = examples.len(), "corpus replaced from server");
        Ok(examples)
    }

    /// Load a listing obtained elsewhere (the login reply). The summary is
    /// replaced too, so nothing from an earlier listing survives.
    pub fn seed(&self, examples: Vec<TrainingExample>, summary: Option<StatusSummary>) {
        let mut state = self.write();
        state.examples = examples;
        state.summary = summary;
        state.refreshed_at = Some(Utc::now());
    }

    /// Submit a new example. The local corpus gains it, untrained, only once
    /// the server acknowledges.
    ///
    /// An existing local entry with the same text is replaced in place. The
    /// verifying refresh then mirrors the server listing as-is, so entries the
    /// server keeps for the same text show up again.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Invalid`] for empty text (nothing is sent) or
    /// [`CorpusError::Api`] when the server does not acknowledge.
    pub async fn add(&self, text: &str, label: Label) -> Result<MutationAck, CorpusError> {
        require_text("text", text)?;

        let reply: MessageReply = self
            .session
            .authorized_request(Method::POST, paths::ADD_DATA, Some(&AddRequest { text, label }))
            .await?;

        {
            let mut state = self.write();
            let entry = TrainingExample::pending(text, label);
            match state.examples.iter_mut().find(|example| example.text == text) {
                Some(existing) => *existing = entry,
                None => state.examples.push(entry),
            }
        }
        tracing::info!(%label, "example added");

        Ok(MutationAck {
            message: reply.message,
            verified: self.verify().await,
        })
    }

    /// Delete the example with exactly this text. The local entry goes away
    /// only once the server acknowledges.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::UnknownExample`] if the text is not held locally
    /// (nothing is sent), or [`CorpusError::Api`] when the server refuses,
    /// including its not-found reply; the local entry then stays.
    pub async fn remove(&self, text: &str) -> Result<MutationAck, CorpusError> {
        if !self.contains(text) {
            return Err(CorpusError::UnknownExample(text.to_string()));
        }

        let reply: MessageReply = self
            .session
            .authorized_request(Method::POST, paths::DELETE_DATA, Some(&TextRequest { text }))
            .await?;

        self.write().examples.retain(|example| example.text != text);
        tracing::info!("example removed");

        Ok(MutationAck {
            message: reply.message,
            verified: self.verify().await,
        })
    }

    async fn verify(&self) -> bool {
        match self.refresh().await {
            Ok(_) => true,
            Err(error) => {
                tracing::warn!(%error, "post-mutation refresh failed; keeping acknowledged state");
                false
            }
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<TrainingExample> {
        self.read().examples.clone()
    }

    #[must_use]
    pub fn counts(&self) -> CorpusCounts {
        CorpusCounts::from_examples(&self.read().examples)
    }

    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.read().examples.iter().any(|example| example.text == text)
    }

    #[must_use]
    pub fn get(&self, text: &str) -> Option<TrainingExample> {
        self.read()
            .examples
            .iter()
            .find(|example| example.text == text)
            .cloned()
    }

    /// Texts of entries not yet incorporated into the model.
    #[must_use]
    pub fn untrained_texts(&self) -> Vec<String> {
        self.read()
            .examples
            .iter()
            .filter(|example| !example.trained)
            .map(|example| example.text.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().examples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().examples.is_empty()
    }

    /// Summary attached to the last listing, if the backend sent one.
    #[must_use]
    pub fn status_summary(&self) -> Option<StatusSummary> {
        self.read().summary.clone()
    }

    #[must_use]
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.read().refreshed_at
    }

    fn read(&self) -> RwLockReadGuard<'_, CorpusState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CorpusState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
