//! Test utilities for stores using wait middleware
//!
//! - [`MockStore`]: a reducer-less store that records every action delivered
//!   through its middleware chain
//! - [`assert_delivered!`](crate::assert_delivered) /
//!   [`assert_not_delivered!`](crate::assert_not_delivered): assertion macros
//!   over recorded actions
//! - Time control helpers behind the `testing-time` feature
//!
//! # Example
//!
//! ```ignore
//! let mut store = MockStore::new(WaitForMiddleware::new());
//!
//! let handle = store.dispatch(AppAction::Wait(wait_for(["Done"]))).unwrap();
//! store.dispatch(AppAction::Done);
//! handle.await?;
//!
//! let delivered = store.drain_delivered();
//! assert_delivered!(delivered, AppAction::Done);
//! ```

use crate::action::Action;
use crate::deferred::WaitHandle;
use crate::middleware::Middleware;

/// A store that records delivered actions instead of reducing state.
///
/// Actions are pushed through the middleware chain exactly as a real store
/// would; whatever reaches the end of the chain is recorded for later
/// assertions.
pub struct MockStore<A: Action, M: Middleware<A>> {
    middleware: M,
    delivered: Vec<A>,
}

impl<A: Action, M: Middleware<A>> MockStore<A, M> {
    /// Create a mock store around the given middleware.
    pub fn new(middleware: M) -> Self {
        Self {
            middleware,
            delivered: Vec::new(),
        }
    }

    /// Dispatch an action through the middleware chain.
    pub fn dispatch(&mut self, action: A) -> Option<WaitHandle> {
        let Self {
            middleware,
            delivered,
        } = self;
        middleware.intercept(action, &mut |action| delivered.push(action))
    }

    /// Actions delivered so far, in dispatch order.
    pub fn delivered(&self) -> &[A] {
        &self.delivered
    }

    /// Take all delivered actions, leaving the record empty.
    pub fn drain_delivered(&mut self) -> Vec<A> {
        std::mem::take(&mut self.delivered)
    }

    /// Get a reference to the middleware (for introspection).
    pub fn middleware(&self) -> &M {
        &self.middleware
    }
}

/// Assert that a specific action was delivered.
///
/// # Example
/// ```ignore
/// let delivered = store.drain_delivered();
/// assert_delivered!(delivered, AppAction::Done);
/// assert_delivered!(delivered, AppAction::SetValue(v) if *v > 0);
/// ```
#[macro_export]
macro_rules! assert_delivered {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` to be delivered, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that a specific action was NOT delivered.
#[macro_export]
macro_rules! assert_not_delivered {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` NOT to be delivered, but it was: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Pause the Tokio clock (requires the `testing-time` feature).
#[cfg(feature = "testing-time")]
pub fn pause_time() {
    tokio::time::pause();
}

/// Resume the Tokio clock.
#[cfg(feature = "testing-time")]
pub fn resume_time() {
    tokio::time::resume();
}

/// Advance the paused Tokio clock, firing any timers that come due.
#[cfg(feature = "testing-time")]
pub async fn advance_time(duration: std::time::Duration) {
    tokio::time::advance(duration).await;
}
