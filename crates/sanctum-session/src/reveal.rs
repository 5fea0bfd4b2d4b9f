//! Timed reveal of a drawn card.

use std::time::Duration;

use sanctum_core::RevealPhase;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Flip duration used when nothing else is configured.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(600);

/// Single-shot timer that reports when a card has finished turning face up.
///
/// Runs on wall-clock time only. Starting a new reveal aborts the previous timer.
#[derive(Debug)]
pub struct RevealAnimator {
    delay: Duration,
    timer: Option<JoinHandle<()>>,
}

impl RevealAnimator {
    pub fn new(delay: Duration) -> Self {
        Self { delay, timer: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Begin a reveal. `event` is delivered on `events` once the delay elapses.
    /// Returns the phase to display immediately.
    pub fn start<E>(&mut self, events: mpsc::Sender<E>, event: E) -> RevealPhase
    where
        E: Send + 'static,
    {
        self.cancel();

        let delay = self.delay;
        self.timer = Some(tokio::spawn(async move {
            sleep(delay).await;
            let _ = events.send(event).await;
        }));

        RevealPhase::Revealing
    }

    /// Abort the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Whether a timer is still counting down.
    pub fn is_pending(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }
}

impl Default for RevealAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_DELAY)
    }
}

impl Drop for RevealAnimator {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut animator = RevealAnimator::default();

        assert_eq!(animator.start(tx, 1u32), RevealPhase::Revealing);
        assert!(animator.is_pending());

        sleep(Duration::from_millis(599)).await;
        assert!(rx.try_recv().is_err());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.recv().await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_supersedes_pending_timer() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut animator = RevealAnimator::default();

        animator.start(tx.clone(), 1u32);
        sleep(Duration::from_millis(300)).await;
        animator.start(tx, 2u32);

        sleep(Duration::from_millis(700)).await;
        assert_eq!(rx.try_recv().ok(), Some(2));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_event() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut animator = RevealAnimator::new(Duration::from_millis(100));

        animator.start(tx, 1u32);
        animator.cancel();
        assert!(!animator.is_pending());

        sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }
}
