use thiserror::Error;

#[derive(Debug, Error)]
pub enum TpmOddsError {
    #[error("Validation error: {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Contract violation in {context}")]
    ContractViolation { context: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Upstream payload error: {0}")]
    Upstream(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl TpmOddsError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TpmOddsError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for TpmOddsError {
    fn from(e: serde_json::Error) -> Self {
        TpmOddsError::SerializationError(e.to_string())
    }
}
