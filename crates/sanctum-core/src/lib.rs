//! # Sanctum Core
//!
//! Core data model for the Oracle Sanctum divination client.
//!
//! This crate provides the fundamental building blocks:
//! - [`ImageArtifact`] / [`DrawRequest`] - the user's input for one submission
//! - [`SubmissionResult`] - outcome of a call to the analysis service
//! - [`DrawnCard`] - a card from the tarot deck
//! - [`SanctumError`] - error taxonomy

pub mod artifact;
pub mod catalog;
pub mod deck;
pub mod error;
pub mod fallback;
pub mod reading;
pub mod types;

// Re-exports for convenience
pub use artifact::{DrawRequest, ImageArtifact, ImageUpload, PreviewHandle, PreviewRegistry, RawImage};
pub use catalog::{Catalog, MessageKey, StaticCatalog};
pub use deck::{draw_card, DrawnCard};
pub use error::{Result, SanctumError};
pub use reading::{Interpretation, OcrReading, SubmissionResult};
pub use types::*;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::artifact::{DrawRequest, ImageArtifact, PreviewRegistry, RawImage};
    pub use crate::error::{Result, SanctumError};
    pub use crate::reading::{Interpretation, OcrReading, SubmissionResult};
    pub use crate::types::{Language, OcrKind, RevealPhase};
}
