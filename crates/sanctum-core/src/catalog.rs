//! Read-only access to localized display text.

use std::collections::HashMap;

use crate::types::Language;

/// Keys of the strings the orchestrator itself produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Shown when submit is pressed with no image.
    NoFileSelected,
    /// Prefix of an OCR failure message.
    UploadFailed,
}

/// Lookup of localized strings.
pub trait Catalog: Send + Sync {
    fn text(&self, language: Language, key: MessageKey) -> String;
}

/// Fixed in-memory catalog, falling back to English for missing entries.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    entries: HashMap<(Language, MessageKey), &'static str>,
}

impl StaticCatalog {
    /// Catalog with the built-in translations.
    pub fn builtin() -> Self {
        let entries = HashMap::from([
            ((Language::En, MessageKey::NoFileSelected), "Please select an image first."),
            ((Language::En, MessageKey::UploadFailed), "Upload failed"),
            ((Language::Zh, MessageKey::NoFileSelected), "请先选择一张图片。"),
            ((Language::Zh, MessageKey::UploadFailed), "上传失败"),
            ((Language::Mi, MessageKey::NoFileSelected), "Tīpakohia he whakaahua i te tuatahi."),
            ((Language::Mi, MessageKey::UploadFailed), "I rahua te tukuake"),
        ]);
        Self { entries }
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog for StaticCatalog {
    fn text(&self, language: Language, key: MessageKey) -> String {
        self.entries
            .get(&(language, key))
            .or_else(|| self.entries.get(&(Language::En, key)))
            .map(|s| s.to_string())
            .unwrap_or_default()
    }
}
