//! Interception engine for outstanding waits
//!
//! The tracker owns the set of outstanding wait registrations. For every
//! action flowing through the pipeline the middleware runs a match pass
//! ([`WaitTracker::observe`]) over the set, then forwards the action, then
//! creates a new registration if the action carried a wait request
//! ([`WaitTracker::register`]).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::deferred::{Deferred, WaitError, WaitHandle};
use crate::wait_for::WaitFor;

/// One outstanding wait.
///
/// Owned exclusively by the tracker's outstanding set; removed exactly once,
/// on resolution, error-action rejection, or timeout, whichever fires first.
struct Registration {
    id: u64,
    remaining: Vec<String>,
    error_action: Option<String>,
    deferred: Deferred,
    timer: Option<AbortHandle>,
}

impl Registration {
    /// Cancel the timeout and fulfill the handle.
    fn resolve(mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.deferred.resolve();
    }

    /// Cancel the timeout and fail the handle.
    fn reject(mut self, error: WaitError) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.deferred.reject(error);
    }
}

/// Read-only snapshot of one outstanding wait, for diagnostics and tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingWait {
    /// Conditions not yet observed.
    pub remaining: Vec<String>,
    /// Early-rejection action name, if any.
    pub error_action: Option<String>,
}

/// The stateful engine tracking outstanding waits.
///
/// All mutation goes through [`observe`](Self::observe) and
/// [`register`](Self::register); the timeout task is the only asynchronous
/// re-entry and synchronizes on the same set.
pub(crate) struct WaitTracker {
    outstanding: Arc<Mutex<Vec<Registration>>>,
    next_id: AtomicU64,
}

impl WaitTracker {
    pub(crate) fn new() -> Self {
        Self {
            outstanding: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Run the match pass for one observed action name.
    ///
    /// Iterates the outstanding set in insertion order. A registration whose
    /// error action matches is rejected and removed without also consuming a
    /// condition for the same action. Otherwise the first occurrence of the
    /// name is removed from the registration's remaining conditions, and an
    /// emptied registration is resolved and removed.
    pub(crate) fn observe(&self, name: &str) {
        let mut settled = Vec::new();
        {
            let mut outstanding = self.lock();
            let mut i = 0;
            while i < outstanding.len() {
                let registration = &mut outstanding[i];

                if registration.error_action.as_deref() == Some(name) {
                    let registration = outstanding.remove(i);
                    settled.push((registration, false));
                    continue;
                }

                if let Some(pos) = registration.remaining.iter().position(|c| c == name) {
                    registration.remaining.remove(pos);
                    if registration.remaining.is_empty() {
                        let registration = outstanding.remove(i);
                        settled.push((registration, true));
                        continue;
                    }
                }

                i += 1;
            }
        }

        // Settle outside the lock; removal above already excludes the
        // timeout task from touching these registrations.
        for (registration, fulfilled) in settled {
            if fulfilled {
                debug!(id = registration.id, "wait resolved");
                registration.resolve();
            } else {
                registration.reject(WaitError::ErrorAction {
                    action: name.to_string(),
                });
            }
        }
    }

    /// Create a registration for a wait request and return its handle.
    ///
    /// A request with no conditions resolves immediately and never schedules
    /// a timer.
    pub(crate) fn register(&self, request: &WaitFor) -> WaitHandle {
        let (deferred, handle) = Deferred::new();

        if request.conditions().is_empty() {
            deferred.resolve();
            return handle;
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(
            id,
            conditions = ?request.conditions(),
            timeout_ms = request.timeout().as_millis() as u64,
            "wait registered"
        );

        // The registration must be in the set before the timer's removal
        // pass can run; holding the lock across the spawn blocks the timer
        // task until the push below is visible.
        let mut outstanding = self.lock();
        let timer = self.schedule_timeout(id, request.timeout());
        outstanding.push(Registration {
            id,
            remaining: request.conditions().to_vec(),
            error_action: request.error_action().map(str::to_string),
            deferred,
            timer,
        });

        handle
    }

    /// Number of outstanding waits.
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    /// Snapshot the outstanding set.
    pub(crate) fn pending(&self) -> Vec<PendingWait> {
        self.lock()
            .iter()
            .map(|registration| PendingWait {
                remaining: registration.remaining.clone(),
                error_action: registration.error_action.clone(),
            })
            .collect()
    }

    /// Spawn the one-shot timeout task for a registration.
    ///
    /// On fire it removes the registration by id and rejects it naming the
    /// still-unmet conditions; if the registration already settled, the
    /// removal finds nothing and the fire is a no-op.
    fn schedule_timeout(&self, id: u64, timeout: Duration) -> Option<AbortHandle> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(id, "no async runtime available, wait has no timeout");
            return None;
        };

        let outstanding = Arc::clone(&self.outstanding);
        let task = runtime.spawn(async move {
            tokio::time::sleep(timeout).await;

            let registration = {
                let mut outstanding = lock(&outstanding);
                outstanding
                    .iter()
                    .position(|r| r.id == id)
                    .map(|pos| outstanding.remove(pos))
            };

            if let Some(registration) = registration {
                let unmet = registration.remaining.clone();
                registration.reject(WaitError::TimedOut { unmet, timeout });
            }
        });

        Some(task.abort_handle())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Registration>> {
        lock(&self.outstanding)
    }
}

impl Drop for WaitTracker {
    fn drop(&mut self) {
        // Abort pending timers; dropping the deferreds abandons the handles.
        for mut registration in self.lock().drain(..) {
            if let Some(timer) = registration.timer.take() {
                timer.abort();
            }
        }
    }
}

fn lock(outstanding: &Mutex<Vec<Registration>>) -> MutexGuard<'_, Vec<Registration>> {
    outstanding.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wait_for::wait_for;
    use crate::WaitError;

    #[tokio::test]
    async fn conditions_met_in_any_order_resolve() {
        let tracker = WaitTracker::new();
        let handle = tracker.register(&wait_for(["A", "B"]));

        tracker.observe("B");
        assert_eq!(tracker.pending()[0].remaining, ["A"]);

        tracker.observe("A");
        assert_eq!(tracker.len(), 0);
        assert_eq!(handle.await, Ok(()));
    }

    #[tokio::test]
    async fn unrelated_actions_do_not_consume_conditions() {
        let tracker = WaitTracker::new();
        let _handle = tracker.register(&wait_for(["A"]));

        tracker.observe("B");
        tracker.observe("C");
        assert_eq!(tracker.pending()[0].remaining, ["A"]);
    }

    #[tokio::test]
    async fn empty_condition_set_resolves_immediately() {
        let tracker = WaitTracker::new();
        let handle = tracker.register(&wait_for(Vec::<String>::new()));

        assert_eq!(tracker.len(), 0);
        assert_eq!(handle.await, Ok(()));
    }

    #[tokio::test]
    async fn duplicate_conditions_need_one_dispatch_each() {
        let tracker = WaitTracker::new();
        let handle = tracker.register(&wait_for(["A", "A"]));

        tracker.observe("A");
        assert_eq!(tracker.pending()[0].remaining, ["A"]);

        tracker.observe("A");
        assert_eq!(tracker.len(), 0);
        assert_eq!(handle.await, Ok(()));
    }

    #[tokio::test]
    async fn error_action_rejects_before_satisfaction() {
        let tracker = WaitTracker::new();
        let handle = tracker.register(&wait_for(["A", "B"]).with_error_action("Failed"));

        tracker.observe("A");
        tracker.observe("Failed");
        assert_eq!(tracker.len(), 0);

        // Later satisfaction cannot change the outcome
        tracker.observe("B");

        let err = handle.await.unwrap_err();
        assert_eq!(
            err,
            WaitError::ErrorAction {
                action: "Failed".into()
            }
        );
    }

    #[tokio::test]
    async fn error_action_does_not_double_count_as_condition() {
        // The error action is also listed as a condition; the rejection
        // must win and the registration must be processed exactly once.
        let tracker = WaitTracker::new();
        let handle = tracker.register(&wait_for(["Failed"]).with_error_action("Failed"));

        tracker.observe("Failed");
        assert_eq!(tracker.len(), 0);
        assert!(matches!(
            handle.await,
            Err(WaitError::ErrorAction { .. })
        ));
    }

    #[tokio::test]
    async fn overlapping_registrations_settle_independently() {
        let tracker = WaitTracker::new();
        let first = tracker.register(&wait_for(["A", "B"]));
        let second = tracker.register(&wait_for(["A"]));

        tracker.observe("A");
        assert_eq!(tracker.len(), 1);
        assert_eq!(second.await, Ok(()));
        assert_eq!(tracker.pending()[0].remaining, ["B"]);

        tracker.observe("B");
        assert_eq!(tracker.len(), 0);
        assert_eq!(first.await, Ok(()));
    }

    #[tokio::test]
    async fn removal_during_match_pass_does_not_skip_later_registrations() {
        let tracker = WaitTracker::new();
        let first = tracker.register(&wait_for(["A"]));
        let second = tracker.register(&wait_for(["A"]));
        let third = tracker.register(&wait_for(["A"]));

        tracker.observe("A");
        assert_eq!(tracker.len(), 0);
        assert_eq!(first.await, Ok(()));
        assert_eq!(second.await, Ok(()));
        assert_eq!(third.await, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_rejects_with_unmet_conditions() {
        let tracker = WaitTracker::new();
        let handle = tracker.register(
            &wait_for(["A", "B"]).with_timeout(Duration::from_millis(2000)),
        );

        tracker.observe("A");
        tokio::time::advance(Duration::from_millis(2000)).await;

        let err = handle.await.unwrap_err();
        assert_eq!(
            err,
            WaitError::TimedOut {
                unmet: vec!["B".into()],
                timeout: Duration::from_millis(2000),
            }
        );
        assert_eq!(tracker.len(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn zero_timeout_always_settles() {
        // The timer task may start sleeping before the registration is
        // pushed; it must still find and reject it once it fires.
        let tracker = WaitTracker::new();
        for _ in 0..200 {
            let handle = tracker.register(&wait_for(["A"]).with_timeout(Duration::ZERO));
            let outcome = tokio::time::timeout(Duration::from_secs(5), handle)
                .await
                .expect("zero-timeout wait settled");
            assert!(matches!(outcome, Err(WaitError::TimedOut { .. })));
            assert_eq!(tracker.len(), 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn resolution_cancels_the_timeout() {
        let tracker = WaitTracker::new();
        let handle = tracker.register(
            &wait_for(["A"]).with_timeout(Duration::from_millis(2000)),
        );

        tracker.observe("A");
        tokio::time::advance(Duration::from_millis(5000)).await;

        assert_eq!(handle.await, Ok(()));
    }

    #[tokio::test]
    async fn dropping_the_tracker_abandons_outstanding_waits() {
        let tracker = WaitTracker::new();
        let handle = tracker.register(&wait_for(["A"]));

        drop(tracker);
        assert_eq!(handle.await, Err(WaitError::Abandoned));
    }
}
