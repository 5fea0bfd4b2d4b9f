//! Error types for the Oracle Sanctum orchestrator.

use thiserror::Error;

/// Main error type for Sanctum operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SanctumError {
    /// Submit was invoked with nothing selected.
    #[error("No artifact selected")]
    NoArtifactSelected,

    /// The selected file is not on the image allow-list.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// A submission for this slot is still awaiting the transport.
    #[error("A submission is already pending for slot {slot}")]
    SubmissionPending { slot: String },

    /// Network, timeout or non-success HTTP status.
    #[error("Request failed: {0}")]
    TransportFailure(String),

    /// The service answered but the body could not be decoded.
    #[error("Unparseable response: {0}")]
    UnparseablePayload(String),

    /// The slot task has shut down.
    #[error("Slot {0} is no longer running")]
    SlotClosed(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local I/O while reading an artifact.
    #[error("I/O error: {0}")]
    Io(String),
}

impl SanctumError {
    /// Returns true if the user can recover by acting again in the same slot.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SanctumError::NoArtifactSelected => true,
            SanctumError::UnsupportedMediaType(_) => true,
            SanctumError::SubmissionPending { .. } => true,
            SanctumError::TransportFailure(_) => true,
            SanctumError::UnparseablePayload(_) => true,
            _ => false,
        }
    }

    /// The message shown to the user when this error settles a submission.
    ///
    /// Transport-level variants yield their bare reason so a `detail` string from
    /// the service reaches the view unchanged.
    pub fn reason(&self) -> String {
        match self {
            SanctumError::TransportFailure(reason) | SanctumError::UnparseablePayload(reason) => {
                reason.clone()
            }
            other => other.to_string(),
        }
    }
}

/// Convenience Result type for Sanctum operations.
pub type Result<T> = std::result::Result<T, SanctumError>;

impl From<serde_json::Error> for SanctumError {
    fn from(err: serde_json::Error) -> Self {
        SanctumError::UnparseablePayload(err.to_string())
    }
}

impl From<std::io::Error> for SanctumError {
    fn from(err: std::io::Error) -> Self {
        SanctumError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strips_prefix_for_transport_errors() {
        let err = SanctumError::TransportFailure("image too large".to_string());
        assert_eq!(err.reason(), "image too large");
        assert_eq!(err.to_string(), "Request failed: image too large");
    }

    #[test]
    fn test_recoverable() {
        assert!(SanctumError::NoArtifactSelected.is_recoverable());
        assert!(SanctumError::TransportFailure("x".into()).is_recoverable());
        assert!(!SanctumError::SlotClosed("face".into()).is_recoverable());
    }

    #[test]
    fn test_json_error_is_unparseable() {
        let err: SanctumError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, SanctumError::UnparseablePayload(_)));
    }
}
