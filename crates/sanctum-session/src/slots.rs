//! The three feature slots wired to one transport.

use std::path::Path;
use std::sync::Arc;

use sanctum_core::{Catalog, OcrKind, RawImage, Result};
use sanctum_sdk::AnalysisTransport;
use tracing::info;

use crate::config::SessionConfig;
use crate::ocr::OcrSlot;
use crate::selector::ArtifactSelector;
use crate::tarot::TarotSlot;

/// Face reading, palm reading and tarot, each running independently.
///
/// Slots share the transport, the catalog and the preview registry, nothing else.
/// Work in one slot never blocks or alters another.
#[derive(Clone)]
pub struct Sanctum {
    face: OcrSlot,
    palm: OcrSlot,
    tarot: TarotSlot,
    selector: ArtifactSelector,
}

impl Sanctum {
    pub fn spawn(
        transport: Arc<dyn AnalysisTransport>,
        catalog: Arc<dyn Catalog>,
        config: &SessionConfig,
    ) -> Self {
        info!(language = %config.language, reveal_delay_ms = config.reveal_delay.as_millis() as u64, "Starting slots");

        Self {
            face: OcrSlot::spawn(OcrKind::Face, transport.clone(), catalog.clone(), config),
            palm: OcrSlot::spawn(OcrKind::Palm, transport.clone(), catalog, config),
            tarot: TarotSlot::spawn(transport, config),
            selector: ArtifactSelector::default(),
        }
    }

    pub fn face(&self) -> &OcrSlot {
        &self.face
    }

    pub fn palm(&self) -> &OcrSlot {
        &self.palm
    }

    pub fn ocr(&self, kind: OcrKind) -> &OcrSlot {
        match kind {
            OcrKind::Face => &self.face,
            OcrKind::Palm => &self.palm,
        }
    }

    pub fn tarot(&self) -> &TarotSlot {
        &self.tarot
    }

    pub fn selector(&self) -> &ArtifactSelector {
        &self.selector
    }

    /// Validate a picked image and hand it to the slot for `kind`.
    ///
    /// A rejected pick leaves the slot untouched.
    pub async fn select_image(&self, kind: OcrKind, raw: Option<RawImage>) -> Result<()> {
        let artifact = self.selector.select_image(raw)?;
        self.ocr(kind).select(artifact).await
    }

    /// Load an image from disk into the slot for `kind`.
    pub async fn select_path(&self, kind: OcrKind, path: &Path) -> Result<()> {
        let artifact = self.selector.read_image(path).await?;
        self.ocr(kind).select(artifact).await
    }
}
