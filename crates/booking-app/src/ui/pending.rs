use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::warn;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PendingError {
    #[error("Action still pending after {0:?}")]
    TimedOut(Duration),
}

/// What [`PendingAction::run`] returns once the action has completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finished<T> {
    pub output: T,
    /// Set when the pending flag was cleared before the action completed.
    pub overran: Option<PendingError>,
}

/// Tracks whether a user action, such as saving a form, is still running.
///
/// The counter published by [`subscribe`](Self::subscribe) is the number of
/// actions in flight; the UI shows a spinner while it is non-zero.
#[derive(Debug)]
pub struct PendingAction {
    in_flight: watch::Sender<usize>,
    timeout: Duration,
}

impl Default for PendingAction {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the counter even if the action's future is dropped early.
struct PendingGuard<'a>(&'a watch::Sender<usize>);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

impl PendingAction {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let (in_flight, _) = watch::channel(0);
        Self { in_flight, timeout }
    }

    pub fn is_pending(&self) -> bool {
        *self.in_flight.borrow() > 0
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.in_flight.subscribe()
    }

    /// Runs `action` to completion, marking it pending for at most the timeout.
    ///
    /// The timeout only bounds the pending flag. An action that overruns it is
    /// never cancelled; it keeps running and its output is still returned, with
    /// [`Finished::overran`] set.
    pub async fn run<F: Future>(&self, action: F) -> Finished<F::Output> {
        self.in_flight.send_modify(|n| *n += 1);
        let guard = PendingGuard(&self.in_flight);
        tokio::pin!(action);

        match tokio::time::timeout(self.timeout, &mut action).await {
            Ok(output) => Finished {
                output,
                overran: None,
            },
            Err(_) => {
                drop(guard);
                warn!(timeout = ?self.timeout, "Action still running, clearing pending flag");
                Finished {
                    output: action.await,
                    overran: Some(PendingError::TimedOut(self.timeout)),
                }
            }
        }
    }
}
