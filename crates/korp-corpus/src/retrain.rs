//! Retrain trigger and delayed reconciliation.
//!
//! The backend acknowledges a retrain request but exposes no job id and no
//! completion event. After an accepted trigger the coordinator schedules
//! reconciliation: wait, re-read the corpus, and compare the `trained` flags
//! of the entries that were untrained at trigger time. Completion is only
//! ever inferred from that comparison; entries may still read untrained when
//! the attempts run out, and that is reported, not treated as a failure.
//!
//! Triggers are not single-flight. Each accepted trigger gets its own
//! reconciliation task, and none of them can be cancelled.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;

use korp_api::Method;
use korp_api::wire::{MessageReply, paths};
use korp_config::RetrainConfig;

use crate::error::CorpusError;
use crate::store::CorpusStore;

/// When and how often to re-read the corpus after a retrain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcilePolicy {
    pub initial_delay: Duration,
    pub max_attempts: u32,
    pub backoff_factor: f64,
    pub max_delay: Duration,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self::from(&RetrainConfig::default())
    }
}

impl From<&RetrainConfig> for ReconcilePolicy {
    fn from(config: &RetrainConfig) -> Self {
        Self {
            initial_delay: config.reconcile_delay(),
            max_attempts: config.max_attempts.max(1),
            backoff_factor: config.backoff_factor,
            max_delay: config.max_delay(),
        }
    }
}

impl ReconcilePolicy {
    /// A single read after `delay`.
    #[must_use]
    pub const fn once_after(delay: Duration) -> Self {
        Self {
            initial_delay: delay,
            max_attempts: 1,
            backoff_factor: 1.0,
            max_delay: delay,
        }
    }

    /// Delay before attempt `attempt` (zero-based), capped at `max_delay`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.backoff_factor.powi(exponent);
        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(secs.max(0.0))
    }
}

/// Result of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub attempts: u32,
    /// Entries untrained at trigger time that now read trained.
    pub newly_trained: Vec<String>,
    /// Entries untrained at trigger time that still read untrained.
    pub still_untrained: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ReconcileReport {
    /// Every watched entry reads trained. Says nothing about entries added
    /// after the trigger.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.still_untrained.is_empty()
    }
}

/// Accepted retrain with a handle on its reconciliation.
#[derive(Debug)]
pub struct RetrainReceipt {
    /// Server message, verbatim.
    pub message: String,
    pub reconciliation: JoinHandle<Result<ReconcileReport, CorpusError>>,
}

impl RetrainReceipt {
    /// Wait for the reconciliation to finish.
    ///
    /// # Errors
    ///
    /// Returns the refresh failure that ended reconciliation, or
    /// [`CorpusError::Reconcile`] if the task itself did not complete.
    pub async fn reconciled(self) -> Result<ReconcileReport, CorpusError> {
        self.reconciliation
            .await
            .map_err(|e| CorpusError::Reconcile(e.to_string()))?
    }
}

/// Decrements the pending counter when a reconciliation task ends.
struct PendingGuard(Arc<AtomicUsize>);

impl PendingGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct RetrainCoordinator {
    store: CorpusStore,
    policy: ReconcilePolicy,
    pending: Arc<AtomicUsize>,
}

impl RetrainCoordinator {
    #[must_use]
    pub fn new(store: CorpusStore, policy: ReconcilePolicy) -> Self {
        Self {
            store,
            policy,
            pending: Arc::default(),
        }
    }

    #[must_use]
    pub const fn policy(&self) -> &ReconcilePolicy {
        &self.policy
    }

    /// Reconciliations scheduled but not yet finished.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Ask the server to retrain and schedule reconciliation.
    ///
    /// Must be called from within a Tokio runtime; reconciliation runs as a
    /// spawned task.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Api`] if the trigger itself is not accepted; no
    /// reconciliation is scheduled then.
    pub async fn trigger_retrain(&self) -> Result<RetrainReceipt, CorpusError> {
        let watched = self.store.untrained_texts();

        let reply: MessageReply = self
            .store
            .session()
            .authorized_request::<(), _>(Method::POST, paths::RETRAIN, None)
            .await?;

        tracing::info!(
            watched = watched.len(),
            delay_ms = u64::try_from(self.policy.initial_delay.as_millis()).unwrap_or(u64::MAX),
            "retrain accepted; reconciliation scheduled"
        );

        let guard = PendingGuard::enter(&self.pending);
        let reconciliation = tokio::spawn(reconcile(
            self.store.clone(),
            self.policy,
            watched,
            guard,
        ));

        Ok(RetrainReceipt {
            message: reply.message,
            reconciliation,
        })
    }
}

async fn reconcile(
    store: CorpusStore,
    policy: ReconcilePolicy,
    watched: Vec<String>,
    _guard: PendingGuard,
) -> Result<ReconcileReport, CorpusError> {
    let started_at = Utc::now();
    let mut attempts = 0;

    loop {
        tokio::time::sleep(policy.delay_for(attempts)).await;
        attempts += 1;

        if let Err(error) = store.refresh().await {
            tracing::warn!(%error, attempts, "reconciliation refresh failed");
            return Err(error);
        }

        let (newly_trained, still_untrained) = split_by_trained(&store, &watched);

        if still_untrained.is_empty() || attempts >= policy.max_attempts {
            let report = ReconcileReport {
                attempts,
                newly_trained,
                still_untrained,
                started_at,
                finished_at: Utc::now(),
            };
            tracing::info!(
                attempts,
                newly_trained = report.newly_trained.len(),
                still_untrained = report.still_untrained.len(),
                "reconciliation finished"
            );
            return Ok(report);
        }
        tracing::debug!(
            attempts,
            still_untrained = still_untrained.len(),
            "retrain not visible yet"
        );
    }
}

/// Watched texts that vanished from the corpus count as neither.
fn split_by_trained(store: &CorpusStore, watched: &[String]) -> (Vec<String>, Vec<String>) {
    let mut trained = Vec::new();
    let mut untrained = Vec::new();
    for example in watched.iter().filter_map(|text| store.get(text)) {
        if example.trained {
            trained.push(example.text);
        } else {
            untrained.push(example.text);
        }
    }
    (trained, untrained)
}
