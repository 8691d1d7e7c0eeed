//! Error types for core contract operations.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No placeholder with this identifier exists in the document.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Population data was not a JSON object.
    #[error("Invalid population data: {0}")]
    InvalidData(String),

    /// Message serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A required input is missing at submission time.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The signer's printed name is empty.
    #[error("Please enter your full name.")]
    MissingName,

    /// No contract date is selected.
    #[error("Please select a contract date.")]
    MissingDate,

    /// Nothing has been drawn on the signature surface.
    #[error("Please provide your digital signature.")]
    MissingSignature,
}
