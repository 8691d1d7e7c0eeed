//! Submission error types.

use inksign_core::ValidationError;
use inksign_renderer::RenderError;
use thiserror::Error;

/// Result type for submission operations.
pub type SubmitResult<T> = Result<T, SubmitError>;

/// The upload did not reach a successful response.
#[derive(Debug, Error)]
pub enum TransmissionError {
    /// HTTP layer failed (connection, timeout, etc.).
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("webhook returned status {0}")]
    Status(u16),
}

/// Errors that can end a submission attempt.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A required input is missing.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The contract could not be rendered.
    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    /// The payload could not be delivered.
    #[error("transmission failed: {0}")]
    Transmission(#[from] TransmissionError),

    /// A submission is already running.
    #[error("a submission is already in progress")]
    InProgress,

    /// The configured endpoint is not a valid URL.
    #[error("invalid webhook URL: {0}")]
    InvalidUrl(String),

    /// The field snapshot could not be serialized.
    #[error("failed to serialize contract data: {0}")]
    Serialization(#[from] serde_json::Error),

    /// There is no successfully submitted contract to save.
    #[error("no submitted contract to save")]
    NothingToSave,

    /// Saving the contract locally failed.
    #[error("failed to save contract: {0}")]
    Io(#[from] std::io::Error),
}

impl SubmitError {
    /// Whether the user can fix the cause and retry with the same session.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Transmission(_) | Self::InProgress
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_passes_through() {
        let err = SubmitError::from(ValidationError::MissingName);
        assert_eq!(err.to_string(), "Please enter your full name.");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_render_is_not_recoverable() {
        let err = SubmitError::from(RenderError::Rasterize("boom".into()));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_status_is_recoverable() {
        let err = SubmitError::from(TransmissionError::Status(502));
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "transmission failed: webhook returned status 502"
        );
    }
}
