//! Local substitute interpretations for when the tarot service is unreachable.

use crate::deck::DrawnCard;
use crate::reading::{Interpretation, SubmissionResult};

/// Build the substitute interpretation for a drawn card.
pub fn synthesize(card: &DrawnCard) -> Interpretation {
    Interpretation {
        judgment: card.fallback_message.clone(),
        advice: String::new(),
        lucky_color: String::new(),
        keywords: Vec::new(),
    }
}

/// What the tarot view displays for a settled result, and whether it was synthesized.
pub fn displayed(result: &SubmissionResult<Interpretation>, card: &DrawnCard) -> (Interpretation, bool) {
    match result {
        SubmissionResult::Success(interpretation) => (interpretation.clone(), false),
        SubmissionResult::Failure { .. } => (synthesize(card), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{DrawnCard, MAJOR_ARCANA};

    #[test]
    fn test_synthesize_uses_fallback_message_only() {
        let card = DrawnCard::from_spec(&MAJOR_ARCANA[17]);
        let interpretation = synthesize(&card);

        assert_eq!(interpretation.judgment, card.fallback_message);
        assert!(interpretation.advice.is_empty());
        assert!(interpretation.lucky_color.is_empty());
        assert!(interpretation.keywords.is_empty());
    }

    #[test]
    fn test_displayed_passes_success_through() {
        let card = DrawnCard::from_spec(&MAJOR_ARCANA[0]);
        let remote = Interpretation {
            judgment: "Leap".to_string(),
            advice: "Pack light".to_string(),
            lucky_color: "white".to_string(),
            keywords: vec!["start".to_string()],
        };

        let (shown, fallback) = displayed(&SubmissionResult::Success(remote.clone()), &card);
        assert_eq!(shown, remote);
        assert!(!fallback);

        let (shown, fallback) = displayed(
            &SubmissionResult::Failure {
                reason: "offline".to_string(),
            },
            &card,
        );
        assert_eq!(shown, synthesize(&card));
        assert!(fallback);
    }
}
