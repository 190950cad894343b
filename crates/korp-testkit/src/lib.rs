//! # korp-testkit
//!
//! A fake classifier backend for korpus tests.
//!
//! [`FakeBackend`] serves every endpoint the console talks to from a
//! `tiny_http` server bound to `127.0.0.1:0` on a background thread. Corpus
//! state lives in memory and can be scripted from the test: revoke tokens,
//! inject failures, delay training completion, override prediction scores.

#![allow(clippy::missing_panics_doc)]

mod handlers;

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use korp_core::{Label, Prediction, TrainingExample};

/// Password the fake accepts unless overridden.
pub const DEFAULT_PASSWORD: &str = "correctpw";

/// One request as seen by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

/// Mutable server-side state. Tests reach it through [`FakeBackend`].
#[derive(Debug)]
pub struct BackendState {
    pub password: String,
    pub examples: Vec<TrainingExample>,
    pub prediction: Prediction,
    pub include_login_data: bool,
    issued_tokens: HashSet<String>,
    tokens_minted: u32,
    failures: HashMap<String, VecDeque<(u16, String)>>,
    training_lag: usize,
    pending_training: Option<usize>,
    requests: Vec<RecordedRequest>,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            password: DEFAULT_PASSWORD.to_string(),
            examples: Vec::new(),
            prediction: Prediction {
                human: 62.4,
                ai: 37.6,
            },
            include_login_data: true,
            issued_tokens: HashSet::new(),
            tokens_minted: 0,
            failures: HashMap::new(),
            training_lag: 0,
            pending_training: None,
            requests: Vec::new(),
        }
    }
}

impl BackendState {
    fn mint_token(&mut self) -> String {
        let token = format!("abc{}", 123 + self.tokens_minted);
        self.tokens_minted += 1;
        self.issued_tokens.insert(token.clone());
        token
    }

    fn take_failure(&mut self, path: &str) -> Option<(u16, String)> {
        self.failures.get_mut(path).and_then(VecDeque::pop_front)
    }

    fn mark_all_trained(&mut self) {
        for example in &mut self.examples {
            example.trained = true;
        }
    }
}

/// Running fake backend. Shuts down on drop.
pub struct FakeBackend {
    server: Arc<tiny_http::Server>,
    state: Arc<Mutex<BackendState>>,
    base_url: String,
    worker: Option<JoinHandle<()>>,
}

impl FakeBackend {
    /// Start an empty backend on a random local port.
    #[must_use]
    pub fn start() -> Self {
        Self::start_with(BackendState::default())
    }

    /// Start a backend preloaded with `examples`.
    #[must_use]
    pub fn with_examples(examples: Vec<TrainingExample>) -> Self {
        Self::start_with(BackendState {
            examples,
            ..BackendState::default()
        })
    }

    #[must_use]
    pub fn start_with(state: BackendState) -> Self {
        let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").expect("bind fake backend"));
        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .expect("fake backend has an IP address");
        let state = Arc::new(Mutex::new(state));

        let worker = {
            let server = Arc::clone(&server);
            let state = Arc::clone(&state);
            std::thread::spawn(move || {
                for request in server.incoming_requests() {
                    handlers::handle(request, &state);
                }
            })
        };

        Self {
            server,
            state,
            base_url: format!("http://127.0.0.1:{port}"),
            worker: Some(worker),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lock the server state for direct inspection or mutation.
    pub fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current server-side corpus.
    #[must_use]
    pub fn examples(&self) -> Vec<TrainingExample> {
        self.state().examples.clone()
    }

    /// Add an entry as if another operator had submitted it.
    pub fn insert_example(&self, text: &str, label: Label, trained: bool) {
        self.state().examples.push(TrainingExample {
            text: text.to_string(),
            label,
            trained,
        });
    }

    /// Invalidate every issued token, as a server-side expiry would.
    pub fn revoke_tokens(&self) {
        self.state().issued_tokens.clear();
    }

    /// Queue a failure for the next request to `path`.
    pub fn fail_next(&self, path: &str, status: u16, message: &str) {
        self.state()
            .failures
            .entry(path.to_string())
            .or_default()
            .push_back((status, message.to_string()));
    }

    /// After a retrain, keep reporting entries as untrained for `reads`
    /// corpus listings before flipping them.
    pub fn set_training_lag(&self, reads: usize) {
        self.state().training_lag = reads;
    }

    pub fn set_prediction(&self, prediction: Prediction) {
        self.state().prediction = prediction;
    }

    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    #[must_use]
    pub fn request_count(&self, path: &str) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|request| request.path == path)
            .count()
    }

    /// A URL nothing is listening on, for transport-failure tests.
    #[must_use]
    pub fn unreachable_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
        let port = listener.local_addr().expect("probe address").port();
        drop(listener);
        format!("http://127.0.0.1:{port}")
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_and_tracked() {
        let mut state = BackendState::default();
        let first = state.mint_token();
        let second = state.mint_token();
        assert_eq!(first, "abc123");
        assert_ne!(first, second);
        assert!(state.issued_tokens.contains(&second));
    }

    #[test]
    fn failures_are_consumed_in_order() {
        let backend = FakeBackend::start();
        backend.fail_next("/add_data", 500, "first");
        backend.fail_next("/add_data", 503, "second");
        let mut state = backend.state();
        assert_eq!(state.take_failure("/add_data"), Some((500, "first".into())));
        assert_eq!(state.take_failure("/add_data"), Some((503, "second".into())));
        assert_eq!(state.take_failure("/add_data"), None);
    }
}
