//! # Sanctum Session
//!
//! Per-feature interaction sessions for the Oracle Sanctum client.
//!
//! Each feature slot (face reading, palm reading, tarot) runs as its own task that
//! owns a [`Session`] state machine. Handles send commands to the task and observe
//! the published view. Completions from superseded submissions are discarded.

pub mod config;
pub mod ocr;
pub mod reveal;
pub mod selector;
pub mod session;
pub mod slots;
pub mod tarot;

#[cfg(test)]
mod testing;

pub use config::SessionConfig;
pub use ocr::{OcrSlot, OcrView};
pub use reveal::{RevealAnimator, DEFAULT_REVEAL_DELAY};
pub use selector::ArtifactSelector;
pub use session::{Session, SessionState};
pub use slots::Sanctum;
pub use tarot::{TarotSlot, TarotState, TarotView};
