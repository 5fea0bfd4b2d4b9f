//! Prints slot views as they change.

use anyhow::bail;
use futures::StreamExt;
use sanctum_core::RevealPhase;
use sanctum_session::{OcrSlot, OcrView, TarotSlot, TarotView};

/// Print OCR progress until the submission settles.
pub async fn follow_ocr(slot: &OcrSlot) -> anyhow::Result<()> {
    let mut updates = slot.updates();
    while let Some(view) = updates.next().await {
        if view.is_loading() {
            println!("⏳ Reading {}...", view.file_name.as_deref().unwrap_or("image"));
            continue;
        }
        if view.state.is_settled() {
            return print_ocr(&view);
        }
    }
    bail!("{} slot stopped before settling", slot.kind())
}

fn print_ocr(view: &OcrView) -> anyhow::Result<()> {
    if let Some(error) = &view.error {
        bail!("{error}");
    }
    if let Some(reading) = view.reading() {
        if let Some(summary) = reading.summary() {
            println!("{summary}");
        }
        if let Some(raw_text) = reading.raw_text() {
            println!("\n{raw_text}");
        }
    }
    Ok(())
}

/// Print the reveal and interpretation until both are done.
pub async fn follow_tarot(slot: &TarotSlot) -> anyhow::Result<()> {
    let mut updates = slot.updates();
    let mut shown = RevealPhase::Hidden;
    let mut working = false;

    while let Some(view) = updates.next().await {
        if view.phase != shown {
            shown = view.phase;
            if let (RevealPhase::Revealed, Some(card)) = (shown, &view.card) {
                println!("✨ {}", card.display_name);
            }
        }
        if view.shows_working() && !working {
            working = true;
            println!("⏳ Consulting the cards...");
        }
        if view.is_complete() {
            print_tarot(&view);
            return Ok(());
        }
    }
    bail!("tarot slot stopped before settling")
}

fn print_tarot(view: &TarotView) {
    let Some(interpretation) = &view.interpretation else {
        return;
    };
    if let Some(question) = &view.question {
        println!("Q: {question}");
    }
    println!("{}", interpretation.judgment);
    if !interpretation.advice.is_empty() {
        println!("Advice: {}", interpretation.advice);
    }
    if !interpretation.lucky_color.is_empty() {
        println!("Lucky color: {}", interpretation.lucky_color);
    }
    if !interpretation.keywords.is_empty() {
        println!("Keywords: {}", interpretation.keywords.join(", "));
    }
    if view.fallback {
        println!("(offline reading)");
    }
}
