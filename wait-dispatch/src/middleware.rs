//! Middleware trait and the wait-for pipeline adapter

use crate::action::Action;
use crate::deferred::WaitHandle;
use crate::tracker::{PendingWait, WaitTracker};

/// The continuation that delivers an action to the next pipeline stage.
pub type Next<'a, A> = &'a mut dyn FnMut(A);

/// Middleware that intercepts actions on their way to the store.
///
/// An implementation receives each dispatched action together with the
/// continuation for the rest of the pipeline and decides how to forward it.
/// Returning `Some` surfaces a [`WaitHandle`] to the original dispatcher;
/// ordinary actions return `None` and dispatch stays fire-and-forget.
pub trait Middleware<A: Action> {
    /// Intercept one dispatched action.
    fn intercept(&mut self, action: A, next: Next<'_, A>) -> Option<WaitHandle>;
}

/// Middleware that resolves wait requests against the action stream.
///
/// Each instance owns its own tracker and outstanding set; the set lives
/// exactly as long as the middleware. For every dispatched action it runs
/// the match pass over outstanding waits, forwards the action unchanged,
/// and then registers a new wait if the action carried a
/// [`WaitFor`](crate::WaitFor) record, returning that wait's handle.
///
/// # Example
/// ```ignore
/// let mut store = StoreWithMiddleware::new(state, reducer, WaitForMiddleware::new());
///
/// let handle = store
///     .dispatch(AppAction::Wait(wait_for(["UserDidLoad", "PostsDidLoad"])))
///     .expect("wait dispatch returns a handle");
///
/// // ... result actions arrive through the same store ...
/// handle.await?;
/// ```
pub struct WaitForMiddleware {
    tracker: WaitTracker,
}

impl WaitForMiddleware {
    /// Create a middleware with an empty outstanding set.
    pub fn new() -> Self {
        Self {
            tracker: WaitTracker::new(),
        }
    }

    /// Number of outstanding waits.
    pub fn len(&self) -> usize {
        self.tracker.len()
    }

    /// Whether no waits are outstanding.
    pub fn is_empty(&self) -> bool {
        self.tracker.len() == 0
    }

    /// Read-only snapshot of the outstanding waits, in insertion order.
    pub fn pending(&self) -> Vec<PendingWait> {
        self.tracker.pending()
    }
}

impl Default for WaitForMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> Middleware<A> for WaitForMiddleware {
    fn intercept(&mut self, action: A, next: Next<'_, A>) -> Option<WaitHandle> {
        // Match pass first: a wait request can never match itself, and the
        // continuation runs before any new registration exists.
        self.tracker.observe(action.name());
        let request = action.wait_for().cloned();
        next(action);
        request.map(|request| self.tracker.register(&request))
    }
}

/// Middleware that forwards every action untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn intercept(&mut self, action: A, next: Next<'_, A>) -> Option<WaitHandle> {
        next(action);
        None
    }
}

/// Middleware that logs each action before forwarding it (for debugging).
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware;

impl<A: Action> Middleware<A> for LoggingMiddleware {
    fn intercept(&mut self, action: A, next: Next<'_, A>) -> Option<WaitHandle> {
        tracing::debug!(action = %action.name(), "dispatching action");
        next(action);
        None
    }
}

/// Two middlewares composed into one, outer first.
///
/// The outer middleware sees the action first; the inner one runs inside
/// the outer's continuation. If both produce a handle the outer one wins.
pub struct Chain<M1, M2>(pub M1, pub M2);

impl<A, M1, M2> Middleware<A> for Chain<M1, M2>
where
    A: Action,
    M1: Middleware<A>,
    M2: Middleware<A>,
{
    fn intercept(&mut self, action: A, next: Next<'_, A>) -> Option<WaitHandle> {
        let Self(outer, inner) = self;
        let mut inner_handle = None;
        let outer_handle = outer.intercept(action, &mut |action| {
            inner_handle = inner.intercept(action, &mut *next);
        });
        outer_handle.or(inner_handle)
    }
}
