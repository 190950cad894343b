//! Cross-cutting error types for korpus.
//!
//! Transport and session errors live in `korp-api`, corpus errors in
//! `korp-corpus`. A unified error is deferred to `korp-cli`.

use thiserror::Error;

/// Errors that can be raised by any korpus crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Input failed validation before anything was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A label string matched none of the known spellings.
    #[error("Unknown label '{0}' (expected human/menschlich or ai/ki)")]
    UnknownLabel(String),
}

/// Reject empty or whitespace-only text.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] naming `field` when `value` has no
/// non-whitespace characters.
pub fn require_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_rejects_whitespace() {
        let err = require_text("text", "  \n\t").unwrap_err();
        assert_eq!(err, CoreError::Validation("text must not be empty".into()));
    }

    #[test]
    fn require_text_accepts_content() {
        assert!(require_text("text", " a ").is_ok());
    }
}
