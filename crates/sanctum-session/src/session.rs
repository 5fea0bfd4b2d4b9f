//! Generic per-slot session state machine.
//!
//! Face, palm and tarot slots all use [`Session`]; they differ only in the artifact
//! they hold and the payload their transport returns. The machine itself is
//! synchronous. The slot drivers own one each and feed it commands and completions.

use sanctum_core::{Cycle, Result, SanctumError, SubmissionResult};

/// State of one feature slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState<O> {
    /// Nothing selected.
    Idle,
    /// An artifact is held and can be submitted.
    ArtifactSelected,
    /// A transport call is outstanding.
    Pending,
    /// The last submission finished.
    Settled(SubmissionResult<O>),
}

impl<O> Default for SessionState<O> {
    fn default() -> Self {
        SessionState::Idle
    }
}

impl<O> SessionState<O> {
    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Pending)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, SessionState::Settled(_))
    }

    /// The settled result, if any.
    pub fn result(&self) -> Option<&SubmissionResult<O>> {
        match self {
            SessionState::Settled(result) => Some(result),
            _ => None,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::ArtifactSelected => "artifact_selected",
            SessionState::Pending => "pending",
            SessionState::Settled(SubmissionResult::Success(_)) => "settled_success",
            SessionState::Settled(SubmissionResult::Failure { .. }) => "settled_failure",
        }
    }
}

/// One slot's artifact, state and cycle counter.
///
/// The held artifact is dropped as soon as it is replaced or the session is reset,
/// which releases any preview resource it owns.
#[derive(Debug)]
pub struct Session<A, O> {
    slot: String,
    state: SessionState<O>,
    artifact: Option<A>,
    cycle: Cycle,
}

impl<A, O> Session<A, O> {
    /// Create an idle session for the named slot.
    pub fn new(slot: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            state: SessionState::Idle,
            artifact: None,
            cycle: Cycle::default(),
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn state(&self) -> &SessionState<O> {
        &self.state
    }

    pub fn artifact(&self) -> Option<&A> {
        self.artifact.as_ref()
    }

    /// The current cycle. Completions from any other cycle are stale.
    pub fn cycle(&self) -> Cycle {
        self.cycle
    }

    /// Hold a new artifact, replacing (and dropping) any previous one.
    ///
    /// Allowed from every state. Selecting while pending starts a new cycle, so the
    /// outstanding call's result will be discarded.
    pub fn select(&mut self, artifact: A) -> Cycle {
        self.cycle = self.cycle.next();
        self.artifact = Some(artifact);
        self.state = SessionState::ArtifactSelected;
        self.cycle
    }

    /// Move to `Pending` for the held artifact.
    ///
    /// Fails with `SubmissionPending` while a call is outstanding and with
    /// `NoArtifactSelected` when nothing is held; neither changes the state.
    /// A settled session that still holds its artifact may submit again.
    pub fn begin_submission(&mut self) -> Result<(Cycle, &A)> {
        if self.state.is_pending() {
            return Err(SanctumError::SubmissionPending {
                slot: self.slot.clone(),
            });
        }

        let Some(artifact) = self.artifact.as_ref() else {
            return Err(SanctumError::NoArtifactSelected);
        };

        self.cycle = self.cycle.next();
        self.state = SessionState::Pending;
        Ok((self.cycle, artifact))
    }

    /// Apply a transport completion. Returns false and changes nothing when the
    /// completion is stale.
    pub fn settle(&mut self, cycle: Cycle, result: SubmissionResult<O>) -> bool {
        if cycle != self.cycle || !self.state.is_pending() {
            return false;
        }
        self.state = SessionState::Settled(result);
        true
    }

    /// Drop the artifact and return to `Idle`.
    pub fn reset(&mut self) {
        self.cycle = self.cycle.next();
        self.artifact = None;
        self.state = SessionState::Idle;
    }
}
