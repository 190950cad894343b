//! Backend client error types.

use korp_core::CoreError;
use thiserror::Error;

/// Errors raised by backend calls and session transitions.
///
/// Failures fall into three classes: transport ([`Self::is_transport`]),
/// application (`Api`, carrying the server's message verbatim) and
/// authorization ([`Self::is_auth_failure`]).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (connect, timeout, body read).
    #[error("connection to backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Well-formed reply marked as an error by the backend.
    #[error("{message} (HTTP {status})")]
    Api {
        /// HTTP status code of the reply.
        status: u16,
        /// Server-provided message, unmodified.
        message: String,
    },

    /// An authorized call was rejected with 401; the session is now expired.
    #[error("authorization rejected: {message}")]
    Unauthorized { message: String },

    /// The backend refused the login credentials.
    #[error("login rejected: {message}")]
    LoginRejected { message: String },

    /// No session has been established; nothing was sent.
    #[error("not logged in; run `korp auth login`")]
    NotAuthenticated,

    /// A previous call found the session expired; nothing was sent.
    #[error("session expired; run `korp auth login` again")]
    SessionExpired,

    /// The reply could not be decoded into the expected shape.
    #[error("unexpected backend reply: {0}")]
    Decode(String),

    #[error("token store error: {0}")]
    TokenStore(String),

    #[error(transparent)]
    Invalid(#[from] CoreError),
}

impl ApiError {
    /// Transport-level failure: the request did not complete.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// The operator must log in again before retrying.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. } | Self::NotAuthenticated | Self::SessionExpired
        )
    }

    /// HTTP status of a rejected reply, if there was one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized { .. } | Self::LoginRejected { .. } => Some(401),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_are_classified() {
        assert!(ApiError::SessionExpired.is_auth_failure());
        assert!(
            ApiError::Unauthorized {
                message: "nope".into()
            }
            .is_auth_failure()
        );
        assert!(
            !ApiError::LoginRejected {
                message: "Falsches Passwort.".into()
            }
            .is_auth_failure()
        );
    }

    #[test]
    fn api_error_shows_server_message_verbatim() {
        let err = ApiError::Api {
            status: 404,
            message: "Text nicht gefunden.".into(),
        };
        assert_eq!(err.to_string(), "Text nicht gefunden. (HTTP 404)");
        assert_eq!(err.status(), Some(404));
    }
}
