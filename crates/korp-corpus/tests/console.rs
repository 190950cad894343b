//! Intent dispatch end to end against the fake backend.

use std::time::Duration;

use korp_api::wire::paths;
use korp_api::{ApiClient, ClassifierClient, Session};
use korp_core::{Label, SessionStatus, TrainingExample};
use korp_corpus::{Console, Intent, Outcome, ReconcilePolicy};
use korp_testkit::{BackendState, DEFAULT_PASSWORD, FakeBackend};
use pretty_assertions::assert_eq;

fn console_for(backend: &FakeBackend) -> Console {
    let client = ApiClient::with_base_url(backend.base_url()).expect("client builds");
    Console::new(
        Session::ephemeral(client.clone()),
        ClassifierClient::new(client),
        ReconcilePolicy::once_after(Duration::from_millis(20)),
    )
}

fn login() -> Intent {
    Intent::Login {
        password: DEFAULT_PASSWORD.to_string(),
    }
}

#[tokio::test]
async fn login_seeds_corpus_from_reply() {
    let backend = FakeBackend::with_examples(vec![TrainingExample::pending("Hallo", Label::Human)]);
    let console = console_for(&backend);

    let outcome = console.dispatch(login()).await.expect("login");

    assert!(matches!(outcome, Outcome::LoggedIn { examples: 1 }));
    assert_eq!(backend.request_count(paths::DATA_STATUS), 0);
    assert!(console.store().contains("Hallo"));
    let summary = console.store().status_summary().expect("summary from login reply");
    assert_eq!(summary.word_counts.expect("word counts").total, 1);
}

#[tokio::test]
async fn relogin_replaces_earlier_summary() {
    let backend = FakeBackend::with_examples(vec![TrainingExample::pending("Hallo", Label::Human)]);
    let console = console_for(&backend);
    console.dispatch(login()).await.expect("login");
    console.dispatch(Intent::Refresh).await.expect("refresh");

    console.dispatch(Intent::Logout).await.expect("logout");
    backend.insert_example("Noch zwei Worte", Label::Ai, false);
    console.dispatch(login()).await.expect("second login");

    let word_counts = console
        .store()
        .status_summary()
        .and_then(|summary| summary.word_counts)
        .expect("word counts from second login");
    assert_eq!(word_counts.ai, 3);
    assert_eq!(word_counts.total, 4);
}

#[tokio::test]
async fn login_without_bundled_data_refreshes() {
    let mut state = BackendState::default();
    state.examples = vec![TrainingExample::pending("Hallo", Label::Human)];
    state.include_login_data = false;
    let backend = FakeBackend::start_with(state);
    let console = console_for(&backend);

    console.dispatch(login()).await.expect("login");

    assert_eq!(backend.request_count(paths::DATA_STATUS), 1);
    assert!(console.store().contains("Hallo"));
}

#[tokio::test]
async fn operator_walkthrough() {
    let backend = FakeBackend::start();
    let console = console_for(&backend);
    console.dispatch(login()).await.expect("login");

    let outcome = console
        .dispatch(Intent::Add {
            text: "Dies ist ein Test".into(),
            label: Label::Ai,
        })
        .await
        .expect("add");
    assert!(matches!(outcome, Outcome::Added(ref ack) if ack.verified));

    let Outcome::RetrainAccepted(receipt) = console.dispatch(Intent::Retrain).await.expect("retrain")
    else {
        panic!("expected retrain receipt");
    };
    assert!(receipt.reconciled().await.expect("reconciled").is_complete());

    let Outcome::Status(status) = console.dispatch(Intent::Status).await.expect("status") else {
        panic!("expected status");
    };
    assert_eq!(status.session, SessionStatus::Authenticated);
    assert_eq!(status.counts.total, 1);
    assert_eq!(status.counts.untrained, 0);

    let Outcome::Stats(stats) = console.dispatch(Intent::FetchStats).await.expect("stats") else {
        panic!("expected stats");
    };
    assert_eq!(stats.ai.word_count, 4);

    let outcome = console
        .dispatch(Intent::Remove {
            text: "Dies ist ein Test".into(),
        })
        .await
        .expect("remove");
    assert!(matches!(outcome, Outcome::Removed(_)));
    assert!(console.store().is_empty());

    assert!(matches!(
        console.dispatch(Intent::Logout).await.expect("logout"),
        Outcome::LoggedOut
    ));
    assert_eq!(console.session().status(), SessionStatus::Anonymous);
}

#[tokio::test]
async fn predict_works_without_login() {
    let backend = FakeBackend::start();
    let console = console_for(&backend);

    let Outcome::Prediction(prediction) = console
        .dispatch(Intent::Predict {
            text: "Irgendein Text".into(),
        })
        .await
        .expect("predict")
    else {
        panic!("expected prediction");
    };

    assert_eq!(prediction.verdict(), Label::Human);
    assert_eq!(console.session().status(), SessionStatus::Anonymous);
}

#[tokio::test]
async fn expired_session_asks_for_login_then_recovers() {
    let backend = FakeBackend::start();
    let console = console_for(&backend);
    console.dispatch(login()).await.expect("login");
    backend.revoke_tokens();

    let err = console.dispatch(Intent::Refresh).await.unwrap_err();
    assert!(err.requires_login());
    assert_eq!(console.session().status(), SessionStatus::Expired);

    console.dispatch(login()).await.expect("re-login");
    assert!(matches!(
        console.dispatch(Intent::Refresh).await.expect("refresh"),
        Outcome::Corpus(_)
    ));
}

#[tokio::test]
async fn wrong_password_is_not_a_session_expiry() {
    let backend = FakeBackend::start();
    let console = console_for(&backend);

    let err = console
        .dispatch(Intent::Login {
            password: "wrongpw".into(),
        })
        .await
        .unwrap_err();

    assert!(!err.requires_login());
    assert_eq!(err.to_string(), "login rejected: Falsches Passwort.");
    assert_eq!(console.session().status(), SessionStatus::Anonymous);
}
