//! The tarot draw slot.
//!
//! A draw starts two independent tasks: the interpretation request and the reveal
//! timer. Both report back through the slot's event channel tagged with the draw's
//! cycle, so either may finish first and anything from a superseded draw is dropped.
//! When the request fails, the card's own fallback message is shown instead.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use sanctum_core::{
    draw_card, fallback, Cycle, DrawRequest, DrawnCard, Interpretation, Language, Result,
    RevealPhase, SanctumError, SubmissionResult,
};
use sanctum_sdk::{AnalysisTransport, InterpretRequest};
use tokio::sync::{mpsc, oneshot, watch};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::reveal::RevealAnimator;
use crate::session::{Session, SessionState};

const SLOT_NAME: &str = "tarot";
const COMMAND_BUFFER: usize = 16;
const EVENT_BUFFER: usize = 16;

/// What the rendering layer shows for the tarot slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TarotView {
    pub state: TarotState,

    /// The card of the current draw.
    pub card: Option<DrawnCard>,

    /// The question sent with the current draw.
    pub question: Option<String>,

    pub phase: RevealPhase,

    /// Interpretation to display, synthesized locally if the service failed.
    pub interpretation: Option<Interpretation>,

    /// True when `interpretation` came from the fallback synthesizer.
    pub fallback: bool,
}

/// State of the tarot slot's session.
pub type TarotState = SessionState<Interpretation>;

impl TarotView {
    pub fn is_interpreting(&self) -> bool {
        self.state.is_pending()
    }

    /// The card is face up but the interpretation has not arrived yet.
    pub fn shows_working(&self) -> bool {
        self.phase == RevealPhase::Revealed && self.is_interpreting()
    }

    /// Face up with something to show.
    pub fn is_complete(&self) -> bool {
        self.phase == RevealPhase::Revealed && self.state.is_settled()
    }
}

/// The artifact of one draw.
#[derive(Debug)]
struct TarotDraw {
    request: DrawRequest,
    card: DrawnCard,
}

enum Command {
    Draw {
        request: DrawRequest,
        reply: oneshot::Sender<Result<DrawnCard>>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
}

enum Event {
    RevealElapsed {
        cycle: Cycle,
    },
    Interpreted {
        cycle: Cycle,
        result: SubmissionResult<Interpretation>,
    },
}

/// Handle to the running tarot slot.
#[derive(Clone)]
pub struct TarotSlot {
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<TarotView>,
}

impl TarotSlot {
    /// Start the slot task.
    pub fn spawn(transport: Arc<dyn AnalysisTransport>, config: &SessionConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (view_tx, view_rx) = watch::channel(TarotView::default());

        let driver = TarotDriver {
            session: Session::new(SLOT_NAME),
            phase: RevealPhase::Hidden,
            animator: RevealAnimator::new(config.reveal_delay),
            rng: StdRng::from_entropy(),
            transport,
            language: config.language,
            events: event_tx,
            view: view_tx,
        };
        tokio::spawn(driver.run(command_rx, event_rx));

        Self {
            commands: command_tx,
            view: view_rx,
        }
    }

    /// Draw a card, optionally asking a question. Supersedes any draw in progress.
    pub async fn draw(&self, question: Option<&str>) -> Result<DrawnCard> {
        self.draw_request(DrawRequest::new(question)).await
    }

    /// Draw with an already normalized request.
    pub async fn draw_request(&self, request: DrawRequest) -> Result<DrawnCard> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Draw { request, reply }).await?;
        rx.await.map_err(|_| closed())?
    }

    /// Put the card away and return to idle.
    pub async fn reset(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Reset { reply }).await?;
        rx.await.map_err(|_| closed())
    }

    /// Current view.
    pub fn view(&self) -> TarotView {
        self.view.borrow().clone()
    }

    /// Every published view, starting with the current one.
    pub fn updates(&self) -> WatchStream<TarotView> {
        WatchStream::new(self.view.clone())
    }

    /// Wait until the card is face up and its interpretation is displayable.
    pub async fn settled(&self) -> Result<TarotView> {
        let mut view = self.view.clone();
        let settled = view
            .wait_for(TarotView::is_complete)
            .await
            .map_err(|_| closed())?;
        Ok(settled.clone())
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands.send(command).await.map_err(|_| closed())
    }
}

fn closed() -> SanctumError {
    SanctumError::SlotClosed(SLOT_NAME.to_string())
}

struct TarotDriver {
    session: Session<TarotDraw, Interpretation>,
    phase: RevealPhase,
    animator: RevealAnimator,
    rng: StdRng,
    transport: Arc<dyn AnalysisTransport>,
    language: Language,
    events: mpsc::Sender<Event>,
    view: watch::Sender<TarotView>,
}

impl TarotDriver {
    async fn run(mut self, mut commands: mpsc::Receiver<Command>, mut events: mpsc::Receiver<Event>) {
        debug!(slot = SLOT_NAME, "Tarot slot started");

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(event) = events.recv() => self.handle_event(event),
            }
        }

        debug!(slot = SLOT_NAME, "Tarot slot stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Draw { request, reply } => {
                let _ = reply.send(self.draw(request));
            }
            Command::Reset { reply } => {
                self.animator.cancel();
                self.session.reset();
                self.phase = RevealPhase::Hidden;
                self.publish();
                let _ = reply.send(());
            }
        }
    }

    fn draw(&mut self, request: DrawRequest) -> Result<DrawnCard> {
        let card = draw_card(&mut self.rng);
        self.session.select(TarotDraw {
            request,
            card: card.clone(),
        });

        let (cycle, interpret) = match self.session.begin_submission() {
            Ok((cycle, draw)) => (
                cycle,
                InterpretRequest::new(&draw.card, &draw.request, self.language),
            ),
            Err(err) => {
                warn!(slot = SLOT_NAME, error = %err, "Draw could not be submitted");
                return Err(err);
            }
        };

        info!(
            slot = SLOT_NAME,
            cycle = %cycle,
            card = %card.identifier,
            has_question = interpret.question.is_some(),
            "Card drawn"
        );

        self.phase = self
            .animator
            .start(self.events.clone(), Event::RevealElapsed { cycle });
        self.spawn_interpretation(cycle, interpret);
        self.publish();

        Ok(card)
    }

    fn spawn_interpretation(&self, cycle: Cycle, request: InterpretRequest) {
        let transport = self.transport.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = transport.interpret(request).await;
            let _ = events.send(Event::Interpreted { cycle, result }).await;
        });
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::RevealElapsed { cycle } => {
                if cycle != self.session.cycle() {
                    debug!(slot = SLOT_NAME, cycle = %cycle, "Ignoring superseded reveal");
                    return;
                }
                self.phase = RevealPhase::Revealed;
                self.publish();
            }
            Event::Interpreted { cycle, result } => {
                let failed = result.is_failure();
                if !self.session.settle(cycle, result) {
                    debug!(slot = SLOT_NAME, cycle = %cycle, "Discarding stale interpretation");
                    return;
                }

                if failed {
                    info!(slot = SLOT_NAME, cycle = %cycle, "Interpretation unavailable, showing fallback");
                } else {
                    info!(slot = SLOT_NAME, cycle = %cycle, "Interpretation received");
                }
                self.publish();
            }
        }
    }

    fn publish(&self) {
        let draw = self.session.artifact();
        let (interpretation, synthesized) = match (self.session.state().result(), draw) {
            (Some(result), Some(draw)) => {
                let (interpretation, synthesized) = fallback::displayed(result, &draw.card);
                (Some(interpretation), synthesized)
            }
            _ => (None, false),
        };

        self.view.send_replace(TarotView {
            state: self.session.state().clone(),
            card: draw.map(|d| d.card.clone()),
            question: draw.and_then(|d| d.request.question().map(str::to_string)),
            phase: self.phase,
            interpretation,
            fallback: synthesized,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;
    use crate::testing::{failure, ScriptedTransport};

    fn spawn(transport: Arc<ScriptedTransport>) -> TarotSlot {
        TarotSlot::spawn(transport, &SessionConfig::default())
    }

    fn star_reading() -> Interpretation {
        Interpretation {
            judgment: "Hope returns".to_string(),
            advice: "Rest and heal".to_string(),
            lucky_color: "silver".to_string(),
            keywords: vec!["renewal".to_string()],
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_question_normalized_in_payload() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_interpretation(Duration::ZERO, SubmissionResult::Success(star_reading()));
        transport.push_interpretation(Duration::ZERO, SubmissionResult::Success(star_reading()));
        let slot = TarotSlot::spawn(
            transport.clone(),
            &SessionConfig::default().with_language(Language::normalize("zh")),
        );

        let first = slot.draw(None).await.unwrap();
        slot.settled().await.unwrap();
        let second = slot.draw(Some(" fortune? ")).await.unwrap();
        slot.settled().await.unwrap();

        let calls = transport.interpret_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].question, None);
        assert_eq!(calls[0].card_name, first.display_name);
        assert_eq!(calls[0].language, Language::Zh);
        assert_eq!(calls[1].question.as_deref(), Some("fortune?"));
        assert_eq!(calls[1].card_name, second.display_name);
        assert_eq!(slot.view().question.as_deref(), Some("fortune?"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_whitespace_question_sent_as_none() {
        let transport = Arc::new(ScriptedTransport::new());
        let slot = spawn(transport.clone());

        slot.draw(Some("   ")).await.unwrap();
        slot.settled().await.unwrap();

        assert_eq!(transport.interpret_calls()[0].question, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_displayed() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_interpretation(
            Duration::from_millis(100),
            SubmissionResult::Success(star_reading()),
        );
        let slot = spawn(transport);

        let card = slot.draw(None).await.unwrap();
        let view = slot.settled().await.unwrap();

        assert_eq!(view.card.as_ref(), Some(&card));
        assert_eq!(view.interpretation, Some(star_reading()));
        assert!(!view.fallback);
        assert!(!view.is_interpreting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_shows_fallback() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_interpretation(Duration::from_secs(2), failure("operation timed out"));
        let slot = spawn(transport);

        let card = slot.draw(None).await.unwrap();
        let view = slot.settled().await.unwrap();

        assert!(view.state.result().is_some_and(|r| r.is_failure()));
        assert!(view.fallback);
        assert_eq!(
            view.interpretation,
            Some(Interpretation {
                judgment: card.fallback_message.clone(),
                advice: String::new(),
                lucky_color: String::new(),
                keywords: Vec::new(),
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_runs_on_its_own_schedule() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_interpretation(Duration::ZERO, SubmissionResult::Success(star_reading()));
        let slot = spawn(transport);

        slot.draw(None).await.unwrap();
        sleep(Duration::from_millis(100)).await;

        let view = slot.view();
        assert!(view.state.is_settled());
        assert_eq!(view.phase, RevealPhase::Revealing);

        sleep(Duration::from_millis(600)).await;
        assert_eq!(slot.view().phase, RevealPhase::Revealed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_working_shown_when_revealed_before_response() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_interpretation(
            Duration::from_secs(2),
            SubmissionResult::Success(star_reading()),
        );
        let slot = spawn(transport);

        slot.draw(None).await.unwrap();
        assert_eq!(slot.view().phase, RevealPhase::Revealing);
        assert!(!slot.view().shows_working());

        sleep(Duration::from_millis(700)).await;
        let view = slot.view();
        assert_eq!(view.phase, RevealPhase::Revealed);
        assert!(view.shows_working());
        assert!(view.interpretation.is_none());

        let view = slot.settled().await.unwrap();
        assert!(!view.shows_working());
        assert_eq!(view.interpretation, Some(star_reading()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_redraw_ignores_superseded_timer() {
        let transport = Arc::new(ScriptedTransport::new());
        let slot = spawn(transport);

        slot.draw(None).await.unwrap();
        sleep(Duration::from_millis(300)).await;
        let second = slot.draw(None).await.unwrap();

        // The first draw's timer would have fired at 600ms.
        sleep(Duration::from_millis(400)).await;
        let view = slot.view();
        assert_eq!(view.card.as_ref(), Some(&second));
        assert_eq!(view.phase, RevealPhase::Revealing);

        sleep(Duration::from_millis(250)).await;
        assert_eq!(slot.view().phase, RevealPhase::Revealed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_redraw_discards_stale_interpretation() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_interpretation(
            Duration::from_millis(1000),
            SubmissionResult::Success(star_reading()),
        );
        transport.push_interpretation(Duration::from_millis(2000), failure("offline"));
        let slot = spawn(transport);

        slot.draw(None).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        let second = slot.draw(None).await.unwrap();

        sleep(Duration::from_millis(1200)).await;
        let view = slot.view();
        assert!(view.is_interpreting());
        assert!(view.interpretation.is_none());

        let view = slot.settled().await.unwrap();
        assert!(view.fallback);
        assert_eq!(
            view.interpretation.map(|i| i.judgment),
            Some(second.fallback_message)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_hides_card() {
        let transport = Arc::new(ScriptedTransport::new());
        let slot = spawn(transport);

        slot.draw(None).await.unwrap();
        slot.reset().await.unwrap();

        let view = slot.view();
        assert_eq!(view, TarotView::default());

        sleep(Duration::from_secs(1)).await;
        assert_eq!(slot.view().phase, RevealPhase::Hidden);
    }
}
