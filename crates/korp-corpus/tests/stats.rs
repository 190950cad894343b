//! Statistics cache against the fake backend.

use korp_api::wire::paths;
use korp_api::{ApiClient, Session};
use korp_core::{Label, TrainingExample, WordCount};
use korp_corpus::StatsCache;
use korp_testkit::{DEFAULT_PASSWORD, FakeBackend};
use pretty_assertions::assert_eq;

async fn logged_in_cache(backend: &FakeBackend) -> StatsCache {
    let client = ApiClient::with_base_url(backend.base_url()).expect("client builds");
    let session = Session::ephemeral(client);
    session.login(DEFAULT_PASSWORD).await.expect("login");
    StatsCache::new(session)
}

fn sky_backend() -> FakeBackend {
    FakeBackend::with_examples(vec![
        TrainingExample::pending("The sky is blue. The sky is clear!", Label::Human),
        TrainingExample::pending("A model wrote this.", Label::Ai),
    ])
}

#[tokio::test]
async fn fetch_fills_cache() {
    let backend = sky_backend();
    let cache = logged_in_cache(&backend).await;
    assert!(cache.cached().is_none());

    let snapshot = cache.fetch_stats().await.expect("stats");

    assert_eq!(snapshot.total_words, 12);
    assert_eq!(snapshot.total_sentences, 3);
    assert_eq!(snapshot.for_label(Label::Ai).word_count, 4);
    assert_eq!(
        snapshot.top_words(Some(Label::Human), 2),
        &[
            WordCount { word: "is".into(), count: 2 },
            WordCount { word: "sky".into(), count: 2 },
        ]
    );
    assert_eq!(cache.cached().map(|cached| cached.snapshot), Some(snapshot));
}

#[tokio::test]
async fn later_fetch_replaces_wholesale() {
    let backend = sky_backend();
    let cache = logged_in_cache(&backend).await;
    let first = cache.fetch_stats().await.expect("first fetch");
    let first_at = cache.cached().expect("cached").fetched_at;

    backend.state().examples.clear();
    let second = cache.fetch_stats().await.expect("second fetch");

    assert_ne!(first, second);
    assert_eq!(second.total_words, 0);
    assert!(second.total_frequent_words.is_empty());
    let cached = cache.cached().expect("cached");
    assert_eq!(cached.snapshot, second);
    assert!(cached.fetched_at >= first_at);
}

#[tokio::test]
async fn failed_fetch_keeps_previous_snapshot() {
    let backend = sky_backend();
    let cache = logged_in_cache(&backend).await;
    let first = cache.fetch_stats().await.expect("first fetch");
    backend.fail_next(paths::STATS, 500, "Fehler beim Abrufen der Statistiken: boom");

    let err = cache.fetch_stats().await.unwrap_err();

    assert!(!err.requires_login());
    assert_eq!(cache.cached().map(|cached| cached.snapshot), Some(first));
}

#[tokio::test]
async fn revoked_token_requires_login() {
    let backend = sky_backend();
    let cache = logged_in_cache(&backend).await;
    backend.revoke_tokens();

    let err = cache.fetch_stats().await.unwrap_err();

    assert!(err.requires_login());
    assert!(cache.cached().is_none());
}
