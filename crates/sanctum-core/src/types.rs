//! Common types used across the Sanctum orchestrator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Languages understood by the interpretation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Chinese.
    Zh,
    /// English (default).
    #[default]
    En,
    /// Māori.
    Mi,
}

impl Language {
    /// Normalize an arbitrary UI language key; anything unrecognized maps to English.
    pub fn normalize(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "zh" => Language::Zh,
            "mi" => Language::Mi,
            _ => Language::En,
        }
    }

    /// Wire code for this language.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
            Language::Mi => "mi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Image types accepted by the artifact selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl MediaType {
    /// The full allow-list, in the order the file picker advertises it.
    pub const ALL: [MediaType; 4] = [
        MediaType::Jpeg,
        MediaType::Png,
        MediaType::Webp,
        MediaType::Gif,
    ];

    /// Match a declared MIME type against the allow-list.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(MediaType::Jpeg),
            "image/png" => Some(MediaType::Png),
            "image/webp" => Some(MediaType::Webp),
            "image/gif" => Some(MediaType::Gif),
            _ => None,
        }
    }

    /// Guess from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(MediaType::Jpeg),
            "png" => Some(MediaType::Png),
            "webp" => Some(MediaType::Webp),
            "gif" => Some(MediaType::Gif),
            _ => None,
        }
    }

    /// Canonical MIME string.
    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Webp => "image/webp",
            MediaType::Gif => "image/gif",
        }
    }

    /// Comma-separated allow-list, as used in a file input's `accept` attribute.
    pub fn accept_list() -> String {
        Self::ALL
            .iter()
            .map(MediaType::mime)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// The two image-reading features. Each has its own endpoint and its own slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrKind {
    Face,
    Palm,
}

impl OcrKind {
    /// Endpoint path relative to the service base URL.
    pub fn path(&self) -> &'static str {
        match self {
            OcrKind::Face => "/ocr/face",
            OcrKind::Palm => "/ocr/palm",
        }
    }
}

impl fmt::Display for OcrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OcrKind::Face => f.write_str("face"),
            OcrKind::Palm => f.write_str("palm"),
        }
    }
}

/// Visual phase of a drawn tarot card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RevealPhase {
    /// Face down, nothing drawn or the flip has not begun.
    #[default]
    Hidden,
    /// Flip in progress.
    Revealing,
    /// Face up.
    Revealed,
}

/// Generation counter for one slot. Completions tagged with an older cycle are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cycle(u64);

impl Cycle {
    /// The cycle after this one.
    pub fn next(self) -> Self {
        Cycle(self.0 + 1)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_normalize() {
        assert_eq!(Language::normalize("zh"), Language::Zh);
        assert_eq!(Language::normalize("MI"), Language::Mi);
        assert_eq!(Language::normalize("en"), Language::En);
        assert_eq!(Language::normalize("fr"), Language::En);
        assert_eq!(Language::normalize(""), Language::En);
    }

    #[test]
    fn test_language_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Language::Mi).unwrap(), "\"mi\"");
    }

    #[test]
    fn test_media_type_allow_list() {
        for media in MediaType::ALL {
            assert_eq!(MediaType::from_mime(media.mime()), Some(media));
        }
        assert_eq!(MediaType::from_mime("IMAGE/PNG; charset=binary"), Some(MediaType::Png));
        assert_eq!(MediaType::from_mime("image/bmp"), None);
        assert_eq!(MediaType::from_mime("application/pdf"), None);
        assert_eq!(
            MediaType::accept_list(),
            "image/jpeg,image/png,image/webp,image/gif"
        );
    }

    #[test]
    fn test_cycle_ordering() {
        let first = Cycle::default();
        assert!(first.next() > first);
        assert_eq!(first.next().to_string(), "1");
    }
}
