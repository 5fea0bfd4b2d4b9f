//! Session configuration.

use std::time::Duration;

use sanctum_core::Language;

use crate::reveal::DEFAULT_REVEAL_DELAY;

/// Settings shared by all slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long a drawn card takes to turn face up.
    pub reveal_delay: Duration,

    /// Display and request language.
    pub language: Language,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reveal_delay: DEFAULT_REVEAL_DELAY,
            language: Language::default(),
        }
    }
}

impl SessionConfig {
    /// Load from `SANCTUM_REVEAL_DELAY_MS` and `SANCTUM_LANGUAGE`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            reveal_delay: std::env::var("SANCTUM_REVEAL_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.reveal_delay),
            language: std::env::var("SANCTUM_LANGUAGE")
                .ok()
                .map(|v| Language::normalize(&v))
                .unwrap_or(defaults.language),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }
}
