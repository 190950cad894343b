//! Operator intents and their dispatch.
//!
//! Every user action is an [`Intent`]. [`Console::dispatch`] runs the one
//! handler for it and returns an [`Outcome`] the front end renders. A failed
//! authorized call surfaces as a [`CorpusError`] whose
//! [`requires_login`](CorpusError::requires_login) tells the front end to
//! re-prompt.

use serde::Serialize;

use korp_api::{ClassifierClient, Session};
use korp_core::{
    CorpusCounts, Label, Prediction, SessionStatus, StatsSnapshot, StatusSummary, TrainingExample,
};

use crate::error::CorpusError;
use crate::retrain::{ReconcilePolicy, RetrainCoordinator, RetrainReceipt};
use crate::stats::StatsCache;
use crate::store::{CorpusStore, MutationAck};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Login { password: String },
    Logout,
    Status,
    Refresh,
    Add { text: String, label: Label },
    Remove { text: String },
    Retrain,
    FetchStats,
    Predict { text: String },
}

#[derive(Debug)]
pub enum Outcome {
    /// Logged in; carries the corpus size after loading it.
    LoggedIn { examples: usize },
    LoggedOut,
    Status(ConsoleStatus),
    Corpus(Vec<TrainingExample>),
    Added(MutationAck),
    Removed(MutationAck),
    RetrainAccepted(RetrainReceipt),
    Stats(StatsSnapshot),
    Prediction(Prediction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleStatus {
    pub session: SessionStatus,
    pub token_source: &'static str,
    pub counts: CorpusCounts,
    pub pending_reconciliations: usize,
}

/// Wires the session, corpus mirror, retrain coordinator, statistics cache
/// and classifier together.
#[derive(Debug, Clone)]
pub struct Console {
    session: Session,
    store: CorpusStore,
    retrain: RetrainCoordinator,
    stats: StatsCache,
    classifier: ClassifierClient,
}

impl Console {
    #[must_use]
    pub fn new(session: Session, classifier: ClassifierClient, policy: ReconcilePolicy) -> Self {
        let store = CorpusStore::new(session.clone());
        Self {
            retrain: RetrainCoordinator::new(store.clone(), policy),
            stats: StatsCache::new(session.clone()),
            store,
            session,
            classifier,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn store(&self) -> &CorpusStore {
        &self.store
    }

    #[must_use]
    pub const fn retrain(&self) -> &RetrainCoordinator {
        &self.retrain
    }

    #[must_use]
    pub const fn stats(&self) -> &StatsCache {
        &self.stats
    }

    #[must_use]
    pub fn status(&self) -> ConsoleStatus {
        ConsoleStatus {
            session: self.session.status(),
            token_source: self.session.token_source(),
            counts: self.store.counts(),
            pending_reconciliations: self.retrain.pending(),
        }
    }

    /// Run the handler for `intent`.
    ///
    /// # Errors
    ///
    /// Returns whatever the underlying operation returns; see
    /// [`CorpusError::requires_login`] for the re-login case.
    pub async fn dispatch(&self, intent: Intent) -> Result<Outcome, CorpusError> {
        tracing::debug!(intent = intent.name(), "dispatching");
        match intent {
            Intent::Login { password } => self.login(&password).await,
            Intent::Logout => {
                self.session.logout();
                Ok(Outcome::LoggedOut)
            }
            Intent::Status => Ok(Outcome::Status(self.status())),
            Intent::Refresh => self.store.refresh().await.map(Outcome::Corpus),
            Intent::Add { text, label } => self.store.add(&text, label).await.map(Outcome::Added),
            Intent::Remove { text } => self.store.remove(&text).await.map(Outcome::Removed),
            Intent::Retrain => self
                .retrain
                .trigger_retrain()
                .await
                .map(Outcome::RetrainAccepted),
            Intent::FetchStats => self.stats.fetch_stats().await.map(Outcome::Stats),
            Intent::Predict { text } => Ok(Outcome::Prediction(
                self.classifier.predict(&text).await?,
            )),
        }
    }

    /// Log in and load the corpus, from the login reply when it carries one.
    async fn login(&self, password: &str) -> Result<Outcome, CorpusError> {
        let grant = self.session.login(password).await?;
        match grant.examples {
            Some(examples) => {
                let summary = grant.word_counts.map(|word_counts| StatusSummary {
                    word_counts: Some(word_counts),
                    ..StatusSummary::default()
                });
                self.store.seed(examples, summary);
            }
            None => {
                self.store.refresh().await?;
            }
        }
        Ok(Outcome::LoggedIn {
            examples: self.store.len(),
        })
    }
}

impl Intent {
    /// Short name for logs. Never includes the payload.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Status => "status",
            Self::Refresh => "refresh",
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Retrain => "retrain",
            Self::FetchStats => "fetch_stats",
            Self::Predict { .. } => "predict",
        }
    }
}
