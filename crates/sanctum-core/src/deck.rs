//! The tarot deck and single-card draws.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Static description of one card in the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSpec {
    pub identifier: &'static str,
    pub display_name: &'static str,
    pub fallback_message: &'static str,
}

/// The 22 Major Arcana.
pub const MAJOR_ARCANA: [CardSpec; 22] = [
    CardSpec {
        identifier: "the-fool",
        display_name: "The Fool",
        fallback_message: "A new beginning calls. Step forward with an open heart.",
    },
    CardSpec {
        identifier: "the-magician",
        display_name: "The Magician",
        fallback_message: "You already hold the tools you need. Act with intent.",
    },
    CardSpec {
        identifier: "the-high-priestess",
        display_name: "The High Priestess",
        fallback_message: "Trust the quiet voice within before seeking answers outside.",
    },
    CardSpec {
        identifier: "the-empress",
        display_name: "The Empress",
        fallback_message: "Nurture what you have planted and abundance will follow.",
    },
    CardSpec {
        identifier: "the-emperor",
        display_name: "The Emperor",
        fallback_message: "Structure and steady leadership will carry you through.",
    },
    CardSpec {
        identifier: "the-hierophant",
        display_name: "The Hierophant",
        fallback_message: "Seek guidance from tradition and those who came before.",
    },
    CardSpec {
        identifier: "the-lovers",
        display_name: "The Lovers",
        fallback_message: "A meaningful choice lies ahead. Let your values decide.",
    },
    CardSpec {
        identifier: "the-chariot",
        display_name: "The Chariot",
        fallback_message: "Focus and willpower bring victory over scattered forces.",
    },
    CardSpec {
        identifier: "strength",
        display_name: "Strength",
        fallback_message: "Gentle courage achieves more than force.",
    },
    CardSpec {
        identifier: "the-hermit",
        display_name: "The Hermit",
        fallback_message: "Step back and reflect; the answer is found in solitude.",
    },
    CardSpec {
        identifier: "wheel-of-fortune",
        display_name: "Wheel of Fortune",
        fallback_message: "The wheel is turning. Embrace the change it brings.",
    },
    CardSpec {
        identifier: "justice",
        display_name: "Justice",
        fallback_message: "Honesty and fairness will set things right.",
    },
    CardSpec {
        identifier: "the-hanged-man",
        display_name: "The Hanged Man",
        fallback_message: "A pause offers a new perspective. Let go and observe.",
    },
    CardSpec {
        identifier: "death",
        display_name: "Death",
        fallback_message: "One chapter closes so another can begin.",
    },
    CardSpec {
        identifier: "temperance",
        display_name: "Temperance",
        fallback_message: "Balance and patience blend opposites into harmony.",
    },
    CardSpec {
        identifier: "the-devil",
        display_name: "The Devil",
        fallback_message: "Notice what binds you; the chains are looser than they seem.",
    },
    CardSpec {
        identifier: "the-tower",
        display_name: "The Tower",
        fallback_message: "Sudden upheaval clears the ground for something truer.",
    },
    CardSpec {
        identifier: "the-star",
        display_name: "The Star",
        fallback_message: "Hope returns. Healing and renewal are on their way.",
    },
    CardSpec {
        identifier: "the-moon",
        display_name: "The Moon",
        fallback_message: "Not everything is as it appears. Move carefully through uncertainty.",
    },
    CardSpec {
        identifier: "the-sun",
        display_name: "The Sun",
        fallback_message: "Joy, clarity and success shine on your path.",
    },
    CardSpec {
        identifier: "judgement",
        display_name: "Judgement",
        fallback_message: "A calling awakens. Answer it without looking back.",
    },
    CardSpec {
        identifier: "the-world",
        display_name: "The World",
        fallback_message: "A cycle completes. Celebrate how far you have come.",
    },
];

/// A card drawn for one draw cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnCard {
    pub identifier: String,
    pub display_name: String,
    pub fallback_message: String,
    pub drawn_at: DateTime<Utc>,
}

impl DrawnCard {
    /// Materialize a card from the deck.
    pub fn from_spec(spec: &CardSpec) -> Self {
        Self {
            identifier: spec.identifier.to_string(),
            display_name: spec.display_name.to_string(),
            fallback_message: spec.fallback_message.to_string(),
            drawn_at: Utc::now(),
        }
    }
}

/// Draw one card uniformly at random.
pub fn draw_card<R: Rng + ?Sized>(rng: &mut R) -> DrawnCard {
    // The deck is a non-empty constant, so `choose` always yields a card.
    let spec = MAJOR_ARCANA.choose(rng).unwrap_or(&MAJOR_ARCANA[0]);
    DrawnCard::from_spec(spec)
}
