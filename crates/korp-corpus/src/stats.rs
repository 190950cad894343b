//! Last-fetched corpus statistics.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use korp_api::wire::paths;
use korp_api::{Method, Session};
use korp_core::StatsSnapshot;

use crate::error::CorpusError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedStats {
    pub snapshot: StatsSnapshot,
    pub fetched_at: DateTime<Utc>,
}

/// Holds the most recent statistics snapshot. A successful fetch replaces it
/// wholesale; a failed fetch leaves it untouched. Stale data is never merged
/// into a new snapshot.
#[derive(Debug, Clone)]
pub struct StatsCache {
    session: Session,
    latest: Arc<RwLock<Option<CachedStats>>>,
}

impl StatsCache {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            latest: Arc::default(),
        }
    }

    /// # Errors
    ///
    /// Returns [`CorpusError::Api`] on any failure; the cached snapshot, if
    /// any, is kept.
    pub async fn fetch_stats(&self) -> Result<StatsSnapshot, CorpusError> {
        let snapshot: StatsSnapshot = self
            .session
            .authorized_request::<(), _>(Method::GET, paths::STATS, None)
            .await?;

        tracing::debug!(total_words = snapshot.total_words, "statistics fetched");
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Some(CachedStats {
            snapshot: snapshot.clone(),
            fetched_at: Utc::now(),
        });
        Ok(snapshot)
    }

    #[must_use]
    pub fn cached(&self) -> Option<CachedStats> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
