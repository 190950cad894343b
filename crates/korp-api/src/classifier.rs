//! Stateless wrapper around the prediction endpoint. Needs no session.

use reqwest::Method;

use korp_core::{Prediction, errors::require_text};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::wire::{TextRequest, paths};

#[derive(Debug, Clone)]
pub struct ClassifierClient {
    client: ApiClient,
}

impl ClassifierClient {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Score `text` as human-written vs. AI-generated. One round trip.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Invalid`] for empty text (nothing is sent), or the
    /// transport/application failure of the call.
    pub async fn predict(&self, text: &str) -> Result<Prediction, ApiError> {
        require_text("text", text)?;
        let prediction: Prediction = self
            .client
            .send(Method::POST, paths::PREDICT, None, Some(&TextRequest { text }))
            .await?;
        tracing::debug!(
            human = prediction.human,
            ai = prediction.ai,
            verdict = %prediction.verdict(),
            "prediction received"
        );
        Ok(prediction)
    }
}
