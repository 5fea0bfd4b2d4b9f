//! Artifact selection.

use std::path::Path;

use sanctum_core::{
    DrawRequest, ImageArtifact, MediaType, PreviewRegistry, RawImage, Result, SanctumError,
};
use tracing::debug;

/// MIME type recorded for files whose extension is not recognized.
const UNKNOWN_MIME: &str = "application/octet-stream";

/// Turns picker input into artifacts. All previews come from one registry.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSelector {
    previews: PreviewRegistry,
}

impl ArtifactSelector {
    pub fn new(previews: PreviewRegistry) -> Self {
        Self { previews }
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Validate a picked file and allocate its preview.
    ///
    /// Only the declared type is checked; size and content are left to the service.
    pub fn select_image(&self, raw: Option<RawImage>) -> Result<ImageArtifact> {
        let raw = raw.ok_or(SanctumError::NoArtifactSelected)?;
        let media_type = MediaType::from_mime(&raw.mime_type)
            .ok_or_else(|| SanctumError::UnsupportedMediaType(raw.mime_type.clone()))?;

        let preview = self.previews.allocate();
        debug!(file = %raw.file_name, mime = media_type.mime(), preview = %preview.id(), "Image selected");

        Ok(ImageArtifact::new(raw.file_name, media_type, raw.bytes, preview))
    }

    /// Build a draw request; blank questions become "no question".
    pub fn select_draw(&self, question: Option<&str>) -> DrawRequest {
        DrawRequest::new(question)
    }

    /// Read an image from disk, typing it by extension.
    pub async fn read_image(&self, path: &Path) -> Result<ImageArtifact> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(MediaType::from_extension)
            .map(|media| media.mime())
            .unwrap_or(UNKNOWN_MIME)
            .to_string();

        self.select_image(Some(RawImage {
            file_name,
            mime_type,
            bytes,
        }))
    }
}
