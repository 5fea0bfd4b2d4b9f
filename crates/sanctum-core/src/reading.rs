//! Results returned by the analysis service.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Response of the face/palm OCR endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OcrReading {
    /// Short human-readable summary.
    #[serde(default)]
    pub summary: Option<String>,

    /// Raw text extracted from the image.
    #[serde(default)]
    pub raw_text: Option<String>,
}

impl OcrReading {
    /// Summary, if present and non-empty.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref().filter(|s| !s.is_empty())
    }

    /// Raw text, if present and non-empty.
    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref().filter(|s| !s.is_empty())
    }
}

/// Response of the tarot interpretation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Interpretation {
    pub judgment: String,

    #[serde(default)]
    pub advice: String,

    #[serde(default)]
    pub lucky_color: String,

    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Outcome of a single transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult<T> {
    /// The service answered with a parseable body.
    Success(T),
    /// Anything else; the reason is user-presentable.
    Failure { reason: String },
}

impl<T> SubmissionResult<T> {
    /// Check if the submission succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success(_))
    }

    /// Check if the submission failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, SubmissionResult::Failure { .. })
    }

    /// The payload, if successful.
    pub fn payload(&self) -> Option<&T> {
        match self {
            SubmissionResult::Success(payload) => Some(payload),
            SubmissionResult::Failure { .. } => None,
        }
    }

    /// The failure reason, if failed.
    pub fn reason(&self) -> Option<&str> {
        match self {
            SubmissionResult::Success(_) => None,
            SubmissionResult::Failure { reason } => Some(reason),
        }
    }
}

impl<T> From<Result<T>> for SubmissionResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(payload) => SubmissionResult::Success(payload),
            Err(err) => SubmissionResult::Failure {
                reason: err.reason(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SanctumError;

    #[test]
    fn test_ocr_reading_tolerates_missing_fields() {
        let reading: OcrReading = serde_json::from_str("{}").unwrap();
        assert_eq!(reading.summary(), None);

        let reading: OcrReading =
            serde_json::from_str(r#"{"summary": "calm, balanced", "raw_text": ""}"#).unwrap();
        assert_eq!(reading.summary(), Some("calm, balanced"));
        assert_eq!(reading.raw_text(), None);
    }

    #[test]
    fn test_interpretation_requires_judgment() {
        assert!(serde_json::from_str::<Interpretation>(r#"{"advice": "rest"}"#).is_err());

        let parsed: Interpretation = serde_json::from_str(
            r#"{"judgment": "yes", "advice": "go", "lucky_color": "gold", "keywords": ["new"]}"#,
        )
        .unwrap();
        assert_eq!(parsed.lucky_color, "gold");
        assert_eq!(parsed.keywords, vec!["new".to_string()]);
    }

    #[test]
    fn test_submission_result_from_error_uses_reason() {
        let result: SubmissionResult<OcrReading> =
            Err(SanctumError::TransportFailure("timed out".to_string())).into();
        assert!(result.is_failure());
        assert_eq!(result.reason(), Some("timed out"));
        assert!(result.payload().is_none());
    }
}
