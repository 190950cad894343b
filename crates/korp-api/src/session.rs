//! Operator session: the single owner of the bearer token.
//!
//! ```text
//! Anonymous ──login ok──▶ Authenticated ──any 401──▶ Expired
//!     ▲   ◀──login failed──      │    ◀─────login ok─────┘
//!     └───────────logout─────────┘
//! ```
//!
//! The token exists only inside the `Authenticated` state, so a session can
//! never claim to be authenticated without one. Every authorized call goes
//! through [`Session::authorized_request`]; a 401 there is the only way into
//! `Expired`, and only a fresh login leaves it. Subscribers observe
//! transitions through [`Session::subscribe`].

use std::fmt;
use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;

use korp_core::{CountsByLabel, SessionStatus, TrainingExample, errors::require_text};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::token_store::{MemoryTokenStore, TokenStore};
use crate::wire::{LoginReply, LoginRequest, paths};

#[derive(Clone, PartialEq, Eq)]
enum SessionState {
    Anonymous,
    Authenticated { token: String },
    Expired,
}

impl SessionState {
    const fn status(&self) -> SessionStatus {
        match self {
            Self::Anonymous => SessionStatus::Anonymous,
            Self::Authenticated { .. } => SessionStatus::Authenticated,
            Self::Expired => SessionStatus::Expired,
        }
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status().as_str())
    }
}

/// What a successful login hands back besides the session transition.
#[derive(Debug, Clone, Default)]
pub struct LoginGrant {
    pub message: Option<String>,
    /// Corpus listing bundled with the login reply, when the backend sends one.
    pub examples: Option<Vec<TrainingExample>>,
    pub word_counts: Option<CountsByLabel>,
}

/// Shared handle to the operator session. Clones observe the same state.
#[derive(Clone)]
pub struct Session {
    client: ApiClient,
    store: Arc<dyn TokenStore>,
    state: Arc<watch::Sender<SessionState>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.client.base_url())
            .field("state", &*self.state.borrow())
            .field("store", &self.store.source())
            .finish()
    }
}

impl Session {
    /// Session backed by `store`. A token persisted by an earlier run
    /// restores the `Authenticated` state; the server may still reject it,
    /// which is discovered on the next authorized call.
    pub fn new(client: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        let initial = match store.load() {
            Some(token) => {
                tracing::debug!(store = store.source(), "restored persisted session token");
                SessionState::Authenticated { token }
            }
            None => SessionState::Anonymous,
        };
        let (state, _) = watch::channel(initial);
        Self {
            client,
            store,
            state: Arc::new(state),
        }
    }

    /// Session that forgets its token when the process exits.
    #[must_use]
    pub fn ephemeral(client: ApiClient) -> Self {
        Self::new(client, Arc::new(MemoryTokenStore::new()))
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    #[must_use]
    pub fn token_source(&self) -> &'static str {
        self.store.source()
    }

    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn subscribe(&self) -> SessionWatch {
        SessionWatch {
            rx: self.state.subscribe(),
        }
    }

    /// Exchange the password for a bearer token.
    ///
    /// The credentials are sent once. On success the token is stored and the
    /// session becomes `Authenticated`; on any failure the session ends up
    /// `Anonymous` without a token. An empty password is rejected before
    /// anything is sent and leaves the state untouched.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Invalid`] for an empty password
    /// - [`ApiError::LoginRejected`] when the backend refuses the password
    /// - [`ApiError::Transport`], [`ApiError::Api`] or [`ApiError::Decode`]
    ///   for other failures
    pub async fn login(&self, password: &str) -> Result<LoginGrant, ApiError> {
        require_text("password", password)?;

        let result = self
            .client
            .send::<_, LoginReply>(
                Method::POST,
                paths::LOGIN,
                None,
                Some(&LoginRequest { password }),
            )
            .await;

        match result {
            Ok(reply) if !reply.token.is_empty() => {
                if let Err(error) = self.store.store(&reply.token) {
                    tracing::warn!(%error, "failed to persist session token; continuing in memory");
                }
                self.transition(SessionState::Authenticated { token: reply.token });
                Ok(LoginGrant {
                    message: reply.message,
                    examples: reply.data,
                    word_counts: reply.word_counts,
                })
            }
            Ok(_) => {
                self.reset_to_anonymous();
                Err(ApiError::Decode("login reply carried no token".into()))
            }
            Err(ApiError::Unauthorized { message }) => {
                self.reset_to_anonymous();
                Err(ApiError::LoginRejected { message })
            }
            Err(error) => {
                self.reset_to_anonymous();
                Err(error)
            }
        }
    }

    /// Drop the token locally and in the store.
    pub fn logout(&self) {
        self.reset_to_anonymous();
    }

    /// Issue an authorized call with the current token attached.
    ///
    /// A 401 reply clears the token and moves the session to `Expired` in
    /// one step, then returns the original failure. Nothing is retried.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotAuthenticated`] / [`ApiError::SessionExpired`] without
    ///   sending anything when no token is held
    /// - [`ApiError::Unauthorized`] when the backend rejects the token
    /// - any transport, application or decode failure of the call itself
    pub async fn authorized_request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = match &*self.state.borrow() {
            SessionState::Authenticated { token } => token.clone(),
            SessionState::Anonymous => return Err(ApiError::NotAuthenticated),
            SessionState::Expired => return Err(ApiError::SessionExpired),
        };

        let result = self.client.send(method, path, Some(&token), body).await;
        if let Err(ApiError::Unauthorized { message }) = &result {
            tracing::info!(path, %message, "backend rejected session token");
            self.expire();
        }
        result
    }

    fn expire(&self) {
        self.transition(SessionState::Expired);
        self.clear_store();
    }

    fn reset_to_anonymous(&self) {
        self.transition(SessionState::Anonymous);
        self.clear_store();
    }

    fn clear_store(&self) {
        if let Err(error) = self.store.clear() {
            tracing::warn!(%error, "failed to clear persisted session token");
        }
    }

    fn transition(&self, next: SessionState) {
        let previous = self.state.send_replace(next);
        let current = self.status();
        if previous.status() != current {
            tracing::info!(from = %previous.status(), to = %current, "session transition");
        }
    }
}

/// Read side of the session state, for components that react to expiry.
#[derive(Debug, Clone)]
pub struct SessionWatch {
    rx: watch::Receiver<SessionState>,
}

impl SessionWatch {
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.rx.borrow().status()
    }

    /// Wait for the next transition. `None` once every session handle is gone.
    pub async fn changed(&mut self) -> Option<SessionStatus> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_client() -> ApiClient {
        ApiClient::with_base_url("http://127.0.0.1:9").unwrap()
    }

    #[test]
    fn fresh_ephemeral_session_is_anonymous() {
        let session = Session::ephemeral(offline_client());
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert!(!session.is_authenticated());
        assert_eq!(session.token_source(), "memory");
    }

    #[test]
    fn persisted_token_restores_authenticated() {
        let store = Arc::new(MemoryTokenStore::holding("abc123"));
        let session = Session::new(offline_client(), store);
        assert!(session.is_authenticated());
    }

    #[test]
    fn debug_output_never_contains_token() {
        let store = Arc::new(MemoryTokenStore::holding("secret-token"));
        let session = Session::new(offline_client(), store);
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("authenticated"));
    }

    #[tokio::test]
    async fn anonymous_call_is_refused_locally() {
        let session = Session::ephemeral(offline_client());
        let err = session
            .authorized_request::<(), serde_json::Value>(Method::GET, paths::DATA_STATUS, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotAuthenticated));
    }

    #[tokio::test]
    async fn empty_password_is_rejected_without_state_change() {
        let store = Arc::new(MemoryTokenStore::holding("abc123"));
        let session = Session::new(offline_client(), store);
        let err = session.login("   ").await.unwrap_err();
        assert!(matches!(err, ApiError::Invalid(_)));
        assert!(session.is_authenticated());
    }

    #[test]
    fn logout_clears_store() {
        let store = Arc::new(MemoryTokenStore::holding("abc123"));
        let session = Session::new(offline_client(), store.clone());
        session.logout();
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert!(store.load().is_none());
    }
}
