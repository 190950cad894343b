//! Low-level HTTP client bound to one backend base URL.

use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{check_response, decode_json};

/// Transport settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: "korpus/0.1".to_string(),
        }
    }
}

/// HTTP client for the classifier backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying `reqwest::Client`
    /// cannot be built.
    pub fn new(base_url: &str, options: &ClientOptions) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(options.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Client with default transport settings.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Self::new(base_url, &ClientOptions::default())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue one request and decode the JSON reply.
    ///
    /// `bearer` is attached as an `Authorization: Bearer` header when present.
    /// The call is never retried.
    pub(crate) async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        bearer: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, path, "backend request");
        let resp = match request.send().await {
            Ok(resp) => resp,
            Err(error) => {
                tracing::debug!(%method, path, %error, "backend unreachable");
                return Err(ApiError::Transport(error));
            }
        };
        tracing::debug!(%method, path, status = resp.status().as_u16(), "backend reply");

        decode_json(check_response(resp).await?).await
    }
}
