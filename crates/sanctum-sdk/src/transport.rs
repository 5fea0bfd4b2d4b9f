//! The transport seam between slots and the analysis service.

use async_trait::async_trait;
use sanctum_core::{
    DrawRequest, DrawnCard, ImageUpload, Interpretation, Language, OcrKind, OcrReading,
    SubmissionResult,
};
use serde::{Deserialize, Serialize};

/// Body of `POST /tarot/interpret`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretRequest {
    pub card_name: String,

    /// Serialized as `null` when no question was asked.
    pub question: Option<String>,

    pub language: Language,
}

impl InterpretRequest {
    /// Request for a drawn card.
    pub fn new(card: &DrawnCard, draw: &DrawRequest, language: Language) -> Self {
        Self {
            card_name: card.display_name.clone(),
            question: draw.question().map(str::to_string),
            language,
        }
    }
}

/// One attempt per call, no retry. Every outcome, including network failure, comes
/// back as a [`SubmissionResult`].
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// Upload an image to the face or palm OCR endpoint.
    async fn recognize(&self, kind: OcrKind, image: ImageUpload) -> SubmissionResult<OcrReading>;

    /// Ask for an interpretation of a drawn card.
    async fn interpret(&self, request: InterpretRequest) -> SubmissionResult<Interpretation>;
}
