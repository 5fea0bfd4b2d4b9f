//! User-supplied artifacts and their preview resources.
//!
//! An artifact is the single input of one submission cycle: an image for the
//! face/palm readers, or a draw request for tarot. Images carry a [`PreviewHandle`]
//! that is released when the artifact is dropped, which is how replacing a selection
//! frees the previous preview.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::MediaType;

/// A file as handed over by the picker, before validation.
#[derive(Debug, Clone)]
pub struct RawImage {
    /// Original file name.
    pub file_name: String,

    /// Declared MIME type.
    pub mime_type: String,

    /// File contents.
    pub bytes: Vec<u8>,
}

/// A validated image owned by exactly one slot.
#[derive(Debug)]
pub struct ImageArtifact {
    file_name: String,
    media_type: MediaType,
    bytes: Vec<u8>,
    preview: PreviewHandle,
}

impl ImageArtifact {
    pub fn new(
        file_name: String,
        media_type: MediaType,
        bytes: Vec<u8>,
        preview: PreviewHandle,
    ) -> Self {
        Self {
            file_name,
            media_type,
            bytes,
            preview,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }

    /// Copy the payload for a transport call; the preview stays with the artifact.
    pub fn upload(&self) -> ImageUpload {
        ImageUpload {
            file_name: self.file_name.clone(),
            media_type: self.media_type,
            bytes: self.bytes.clone(),
        }
    }
}

/// The binary part sent to an OCR endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub media_type: MediaType,
    pub bytes: Vec<u8>,
}

/// A tarot draw, optionally with the question the user asked.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrawRequest {
    question: Option<String>,
}

impl DrawRequest {
    /// Build a draw request. Whitespace-only questions count as no question.
    pub fn new(question: Option<&str>) -> Self {
        let question = question
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        Self { question }
    }

    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    live: HashSet<Uuid>,
    released: u64,
}

/// Table of live preview resources, the analogue of a browser's object-URL store.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl PreviewRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new preview handle.
    pub fn allocate(&self) -> PreviewHandle {
        let id = Uuid::new_v4();
        self.lock().live.insert(id);
        PreviewHandle {
            id,
            registry: self.clone(),
        }
    }

    /// Number of handles not yet released.
    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    /// Number of releases performed so far.
    pub fn released_count(&self) -> u64 {
        self.lock().released
    }

    /// Whether the handle with this id is still allocated.
    pub fn is_live(&self, id: Uuid) -> bool {
        self.lock().live.contains(&id)
    }

    fn release(&self, id: Uuid) {
        let mut state = self.lock();
        if state.live.remove(&id) {
            state.released += 1;
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // The state is a plain set and counter; a poisoned lock still holds valid data.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A scoped preview resource. Released on drop.
pub struct PreviewHandle {
    id: Uuid,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Locally resolvable URL for rendering the preview.
    pub fn url(&self) -> String {
        format!("blob:sanctum/{}", self.id)
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle").field("id", &self.id).finish()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_request_trims_question() {
        assert_eq!(DrawRequest::new(Some(" fortune? ")).question(), Some("fortune?"));
        assert_eq!(DrawRequest::new(Some("   ")).question(), None);
        assert_eq!(DrawRequest::new(Some("")).question(), None);
        assert_eq!(DrawRequest::new(None).question(), None);
    }

    #[test]
    fn test_preview_released_once_on_drop() {
        let registry = PreviewRegistry::new();
        let handle = registry.allocate();
        let id = handle.id();

        assert!(registry.is_live(id));
        assert_eq!(registry.live_count(), 1);

        drop(handle);

        assert!(!registry.is_live(id));
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.released_count(), 1);
    }

    #[test]
    fn test_upload_keeps_preview_alive() {
        let registry = PreviewRegistry::new();
        let artifact = ImageArtifact::new(
            "face.png".to_string(),
            MediaType::Png,
            vec![1, 2, 3],
            registry.allocate(),
        );
        let upload = artifact.upload();

        assert_eq!(upload.bytes, vec![1, 2, 3]);
        assert_eq!(upload.media_type, MediaType::Png);
        assert_eq!(registry.live_count(), 1);
        assert!(artifact.preview().url().starts_with("blob:sanctum/"));
    }
}
