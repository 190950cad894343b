//! Retrain trigger and reconciliation against the fake backend.

use std::time::Duration;

use korp_api::wire::paths;
use korp_api::{ApiClient, Session};
use korp_core::{Label, SessionStatus, TrainingExample};
use korp_corpus::{CorpusStore, ReconcilePolicy, RetrainCoordinator};
use korp_testkit::{DEFAULT_PASSWORD, FakeBackend};
use pretty_assertions::assert_eq;

const QUICK: Duration = Duration::from_millis(20);

async fn logged_in_store(backend: &FakeBackend) -> CorpusStore {
    let client = ApiClient::with_base_url(backend.base_url()).expect("client builds");
    let session = Session::ephemeral(client);
    session.login(DEFAULT_PASSWORD).await.expect("login");
    let store = CorpusStore::new(session);
    store.refresh().await.expect("initial refresh");
    store
}

fn untrained_backend() -> FakeBackend {
    FakeBackend::with_examples(vec![
        TrainingExample::pending("erster Text", Label::Human),
        TrainingExample::pending("zweiter Text", Label::Ai),
    ])
}

#[tokio::test]
async fn immediate_training_reconciles_on_first_read() {
    let backend = untrained_backend();
    let store = logged_in_store(&backend).await;
    let coordinator = RetrainCoordinator::new(store.clone(), ReconcilePolicy::once_after(QUICK));

    let receipt = coordinator.trigger_retrain().await.expect("retrain accepted");
    assert_eq!(receipt.message, "Modell wurde erfolgreich neu trainiert.");

    let report = receipt.reconciled().await.expect("reconciled");
    assert_eq!(report.attempts, 1);
    assert!(report.is_complete());
    assert_eq!(report.newly_trained, vec!["erster Text", "zweiter Text"]);
    assert!(store.untrained_texts().is_empty());
    assert!(coordinator.is_idle());
}

#[tokio::test]
async fn slow_training_is_reported_not_failed() {
    let backend = untrained_backend();
    let store = logged_in_store(&backend).await;
    backend.set_training_lag(1);
    let coordinator = RetrainCoordinator::new(store.clone(), ReconcilePolicy::once_after(QUICK));

    let report = coordinator
        .trigger_retrain()
        .await
        .expect("retrain accepted")
        .reconciled()
        .await
        .expect("reconciled");

    assert!(!report.is_complete());
    assert_eq!(report.still_untrained, vec!["erster Text", "zweiter Text"]);
    assert!(report.newly_trained.is_empty());

    store.refresh().await.expect("later refresh");
    assert!(store.untrained_texts().is_empty());
}

#[tokio::test]
async fn backoff_keeps_reading_until_trained() {
    let backend = untrained_backend();
    let store = logged_in_store(&backend).await;
    backend.set_training_lag(2);
    let policy = ReconcilePolicy {
        initial_delay: Duration::from_millis(10),
        max_attempts: 5,
        backoff_factor: 2.0,
        max_delay: Duration::from_millis(40),
    };
    let coordinator = RetrainCoordinator::new(store.clone(), policy);
    let reads_before = backend.request_count(paths::DATA_STATUS);

    let report = coordinator
        .trigger_retrain()
        .await
        .expect("retrain accepted")
        .reconciled()
        .await
        .expect("reconciled");

    assert_eq!(report.attempts, 3);
    assert!(report.is_complete());
    assert_eq!(backend.request_count(paths::DATA_STATUS) - reads_before, 3);
}

#[tokio::test]
async fn entries_added_after_trigger_are_not_watched() {
    let backend = FakeBackend::start();
    let store = logged_in_store(&backend).await;
    backend.set_training_lag(3);
    let coordinator = RetrainCoordinator::new(
        store.clone(),
        ReconcilePolicy::once_after(Duration::from_millis(100)),
    );

    let receipt = coordinator.trigger_retrain().await.expect("retrain accepted");
    store.add("spät", Label::Human).await.expect("add acknowledged");
    let report = receipt.reconciled().await.expect("reconciled");

    assert!(report.is_complete());
    assert!(report.newly_trained.is_empty());
    assert!(store.untrained_texts().contains(&"spät".to_string()));
}

#[tokio::test]
async fn concurrent_triggers_each_reconcile() {
    let backend = untrained_backend();
    let store = logged_in_store(&backend).await;
    let coordinator = RetrainCoordinator::new(
        store.clone(),
        ReconcilePolicy::once_after(Duration::from_millis(100)),
    );

    let first = coordinator.trigger_retrain().await.expect("first accepted");
    let second = coordinator.trigger_retrain().await.expect("second accepted");
    assert_eq!(coordinator.pending(), 2);
    assert_eq!(backend.request_count(paths::RETRAIN), 2);

    let (first, second) = tokio::join!(first.reconciled(), second.reconciled());
    assert!(first.expect("first reconciled").is_complete());
    assert!(second.expect("second reconciled").attempts >= 1);
    assert!(coordinator.is_idle());
}

#[tokio::test]
async fn rejected_trigger_schedules_nothing() {
    let backend = untrained_backend();
    let store = logged_in_store(&backend).await;
    backend.fail_next(paths::RETRAIN, 500, "Fehler beim Training: kaputt");
    let coordinator = RetrainCoordinator::new(store.clone(), ReconcilePolicy::once_after(QUICK));
    let reads_before = backend.request_count(paths::DATA_STATUS);

    let err = coordinator.trigger_retrain().await.unwrap_err();

    assert!(!err.requires_login());
    assert!(coordinator.is_idle());
    tokio::time::sleep(QUICK * 3).await;
    assert_eq!(backend.request_count(paths::DATA_STATUS), reads_before);
    assert_eq!(store.untrained_texts().len(), 2);
}

#[tokio::test]
async fn expiry_during_reconciliation_surfaces_as_login_required() {
    let backend = untrained_backend();
    let store = logged_in_store(&backend).await;
    let coordinator = RetrainCoordinator::new(
        store.clone(),
        ReconcilePolicy::once_after(Duration::from_millis(50)),
    );

    let receipt = coordinator.trigger_retrain().await.expect("retrain accepted");
    backend.revoke_tokens();
    let err = receipt.reconciled().await.unwrap_err();

    assert!(err.requires_login());
    assert_eq!(store.session().status(), SessionStatus::Expired);
    assert_eq!(store.len(), 2);
    assert!(coordinator.is_idle());
}
