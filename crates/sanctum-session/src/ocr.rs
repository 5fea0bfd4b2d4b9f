//! Face and palm reading slots.

use std::sync::Arc;

use sanctum_core::{
    Catalog, Cycle, ImageArtifact, ImageUpload, Language, MessageKey, OcrKind, OcrReading,
    Result, SanctumError, SubmissionResult,
};
use sanctum_sdk::AnalysisTransport;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::session::{Session, SessionState};

const COMMAND_BUFFER: usize = 16;
const EVENT_BUFFER: usize = 16;

/// What the rendering layer shows for one OCR slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrView {
    pub slot: OcrKind,

    pub state: SessionState<OcrReading>,

    /// Name of the selected file.
    pub file_name: Option<String>,

    /// Preview URL of the selected file.
    pub preview_url: Option<String>,

    /// Inline message: the "no file" notice or an upload failure.
    pub error: Option<String>,
}

impl OcrView {
    fn empty(slot: OcrKind) -> Self {
        Self {
            slot,
            state: SessionState::Idle,
            file_name: None,
            preview_url: None,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_pending()
    }

    /// The reading to put in the result box. Never present alongside a failure.
    pub fn reading(&self) -> Option<&OcrReading> {
        match &self.state {
            SessionState::Settled(SubmissionResult::Success(reading)) => Some(reading),
            _ => None,
        }
    }
}

enum Command {
    Select {
        artifact: ImageArtifact,
        reply: oneshot::Sender<()>,
    },
    Submit {
        reply: oneshot::Sender<Result<Cycle>>,
    },
    Clear {
        reply: oneshot::Sender<()>,
    },
}

enum Event {
    Recognized {
        cycle: Cycle,
        result: SubmissionResult<OcrReading>,
    },
}

/// Handle to a running face or palm slot.
#[derive(Clone)]
pub struct OcrSlot {
    kind: OcrKind,
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<OcrView>,
}

impl OcrSlot {
    /// Start the slot task. It stops, releasing any preview, once every handle is dropped.
    pub fn spawn(
        kind: OcrKind,
        transport: Arc<dyn AnalysisTransport>,
        catalog: Arc<dyn Catalog>,
        config: &SessionConfig,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (view_tx, view_rx) = watch::channel(OcrView::empty(kind));

        let driver = OcrDriver {
            kind,
            session: Session::new(kind.to_string()),
            notice: None,
            transport,
            catalog,
            language: config.language,
            events: event_tx,
            view: view_tx,
        };
        tokio::spawn(driver.run(command_rx, event_rx));

        Self {
            kind,
            commands: command_tx,
            view: view_rx,
        }
    }

    pub fn kind(&self) -> OcrKind {
        self.kind
    }

    /// Hold a new image, releasing the previous one.
    pub async fn select(&self, artifact: ImageArtifact) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Select { artifact, reply }).await?;
        rx.await.map_err(|_| self.closed())
    }

    /// Submit the held image. Returns once the slot is pending.
    pub async fn submit(&self) -> Result<Cycle> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Submit { reply }).await?;
        rx.await.map_err(|_| self.closed())?
    }

    /// Drop the held image and go back to idle.
    pub async fn clear(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Clear { reply }).await?;
        rx.await.map_err(|_| self.closed())
    }

    /// Current view.
    pub fn view(&self) -> OcrView {
        self.view.borrow().clone()
    }

    /// Every published view, starting with the current one.
    pub fn updates(&self) -> WatchStream<OcrView> {
        WatchStream::new(self.view.clone())
    }

    /// Wait until no submission is outstanding.
    pub async fn settled(&self) -> Result<OcrView> {
        let mut view = self.view.clone();
        let settled = view
            .wait_for(|v| !v.is_loading())
            .await
            .map_err(|_| self.closed())?;
        Ok(settled.clone())
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands.send(command).await.map_err(|_| self.closed())
    }

    fn closed(&self) -> SanctumError {
        SanctumError::SlotClosed(self.kind.to_string())
    }
}

struct OcrDriver {
    kind: OcrKind,
    session: Session<ImageArtifact, OcrReading>,
    notice: Option<String>,
    transport: Arc<dyn AnalysisTransport>,
    catalog: Arc<dyn Catalog>,
    language: Language,
    events: mpsc::Sender<Event>,
    view: watch::Sender<OcrView>,
}

impl OcrDriver {
    async fn run(mut self, mut commands: mpsc::Receiver<Command>, mut events: mpsc::Receiver<Event>) {
        debug!(slot = %self.kind, "OCR slot started");

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(event) = events.recv() => self.handle_event(event),
            }
        }

        debug!(slot = %self.kind, "OCR slot stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Select { artifact, reply } => {
                let cycle = self.session.select(artifact);
                debug!(slot = %self.kind, cycle = %cycle, "Artifact selected");
                self.notice = None;
                self.publish();
                let _ = reply.send(());
            }
            Command::Submit { reply } => {
                let _ = reply.send(self.submit());
            }
            Command::Clear { reply } => {
                self.session.reset();
                self.notice = None;
                self.publish();
                let _ = reply.send(());
            }
        }
    }

    fn submit(&mut self) -> Result<Cycle> {
        let (cycle, upload) = match self.session.begin_submission() {
            Ok((cycle, artifact)) => (cycle, artifact.upload()),
            Err(err) => {
                if err == SanctumError::NoArtifactSelected {
                    self.notice = Some(self.catalog.text(self.language, MessageKey::NoFileSelected));
                    self.publish();
                }
                return Err(err);
            }
        };

        info!(slot = %self.kind, cycle = %cycle, file = %upload.file_name, "Submitting image");
        self.spawn_recognition(cycle, upload);
        self.notice = None;
        self.publish();
        Ok(cycle)
    }

    fn spawn_recognition(&self, cycle: Cycle, upload: ImageUpload) {
        let transport = self.transport.clone();
        let events = self.events.clone();
        let kind = self.kind;
        tokio::spawn(async move {
            let result = transport.recognize(kind, upload).await;
            let _ = events.send(Event::Recognized { cycle, result }).await;
        });
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Recognized { cycle, result } => {
                let notice = result.reason().map(|reason| {
                    format!(
                        "{}: {}",
                        self.catalog.text(self.language, MessageKey::UploadFailed),
                        reason
                    )
                });

                if !self.session.settle(cycle, result) {
                    debug!(slot = %self.kind, cycle = %cycle, "Discarding stale OCR result");
                    return;
                }

                info!(slot = %self.kind, cycle = %cycle, state = self.session.state().name(), "OCR settled");
                self.notice = notice;
                self.publish();
            }
        }
    }

    fn publish(&self) {
        let artifact = self.session.artifact();
        self.view.send_replace(OcrView {
            slot: self.kind,
            state: self.session.state().clone(),
            file_name: artifact.map(|a| a.file_name().to_string()),
            preview_url: artifact.map(|a| a.preview().url()),
            error: self.notice.clone(),
        });
    }
}
