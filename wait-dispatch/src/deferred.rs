//! Externally settled one-shot futures
//!
//! A [`Deferred`] is the settling side of a wait: it fulfills or fails the
//! paired [`WaitHandle`] exactly once. Both settle operations consume the
//! `Deferred`, so double settlement is unrepresentable.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::warn;

/// Why a wait failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WaitError {
    /// The timeout elapsed with some conditions still unmet.
    #[error("timed out after {}ms waiting for actions: {}", timeout.as_millis(), unmet.join(", "))]
    TimedOut {
        /// Conditions still unmet when the timer fired.
        unmet: Vec<String>,
        /// The configured timeout.
        timeout: Duration,
    },
    /// The designated error action was dispatched before all conditions
    /// were met.
    #[error("received error action {action:?} before all awaited actions arrived")]
    ErrorAction {
        /// Name of the action that triggered the rejection.
        action: String,
    },
    /// The tracker was dropped before the wait settled.
    #[error("wait was dropped before it settled")]
    Abandoned,
}

/// The settling side of a wait.
pub struct Deferred {
    tx: oneshot::Sender<Result<(), WaitError>>,
}

impl Deferred {
    /// Create a deferred together with the handle that observes it.
    pub fn new() -> (Self, WaitHandle) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, WaitHandle { rx })
    }

    /// Fulfill the paired handle with no payload.
    ///
    /// A no-op if the handle was already dropped.
    pub fn resolve(self) {
        let _ = self.tx.send(Ok(()));
    }

    /// Fail the paired handle with the given reason.
    ///
    /// The reason is also emitted at warn level on the ambient `tracing`
    /// channel; with no subscriber installed that is a no-op. A no-op if the
    /// handle was already dropped.
    pub fn reject(self, error: WaitError) {
        warn!(%error, "rejecting wait");
        let _ = self.tx.send(Err(error));
    }
}

/// A future that settles when its paired [`Deferred`] does.
///
/// Yields `Ok(())` on [`Deferred::resolve`], `Err(WaitError)` on
/// [`Deferred::reject`], and [`WaitError::Abandoned`] if the deferred is
/// dropped unsettled.
#[derive(Debug)]
pub struct WaitHandle {
    rx: oneshot::Receiver<Result<(), WaitError>>,
}

impl Future for WaitHandle {
    type Output = Result<(), WaitError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Err(WaitError::Abandoned)),
            Poll::Pending => Poll::Pending,
        }
    }
}
