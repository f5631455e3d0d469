//! Minimal host store for dispatching actions through middleware
//!
//! The wait middleware only needs a pipeline of the shape
//! "dispatch → middleware → reducer"; this module provides a small reducer
//! store so demos and tests have one. Any host with the same shape can
//! install [`Middleware`] implementations instead.

use std::marker::PhantomData;

use crate::action::Action;
use crate::deferred::WaitHandle;
use crate::middleware::Middleware;

/// A reducer function that applies an action to the state.
pub type Reducer<S, A> = fn(&mut S, A);

/// Centralized state container with a Redux-like reducer.
///
/// # Example
/// ```ignore
/// #[derive(Default)]
/// struct AppState {
///     user: Option<String>,
/// }
///
/// fn reducer(state: &mut AppState, action: AppAction) {
///     if let AppAction::UserDidLoad(name) = action {
///         state.user = Some(name);
///     }
/// }
///
/// let mut store = Store::new(AppState::default(), reducer);
/// store.dispatch(AppAction::UserDidLoad("ada".into()));
/// ```
pub struct Store<S, A: Action> {
    state: S,
    reducer: Reducer<S, A>,
    _marker: PhantomData<A>,
}

impl<S, A: Action> Store<S, A> {
    /// Create a new store with initial state and reducer.
    pub fn new(state: S, reducer: Reducer<S, A>) -> Self {
        Self {
            state,
            reducer,
            _marker: PhantomData,
        }
    }

    /// Dispatch an action directly to the reducer.
    pub fn dispatch(&mut self, action: A) {
        (self.reducer)(&mut self.state, action)
    }

    /// Get a reference to the current state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Get a mutable reference to the state.
    ///
    /// Use this sparingly - prefer dispatching actions for state changes.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }
}

/// A store whose dispatch path runs through middleware.
///
/// Dispatching an action that carries a wait request returns the wait's
/// handle; ordinary dispatches return `None`.
pub struct StoreWithMiddleware<S, A: Action, M: Middleware<A>> {
    store: Store<S, A>,
    middleware: M,
}

impl<S, A: Action, M: Middleware<A>> StoreWithMiddleware<S, A, M> {
    /// Create a new store with middleware.
    pub fn new(state: S, reducer: Reducer<S, A>, middleware: M) -> Self {
        Self {
            store: Store::new(state, reducer),
            middleware,
        }
    }

    /// Dispatch an action through the middleware into the reducer.
    pub fn dispatch(&mut self, action: A) -> Option<WaitHandle> {
        let Self { store, middleware } = self;
        middleware.intercept(action, &mut |action| store.dispatch(action))
    }

    /// Get a reference to the current state.
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Get a mutable reference to the state.
    pub fn state_mut(&mut self) -> &mut S {
        self.store.state_mut()
    }

    /// Get a reference to the middleware (for introspection).
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Get a mutable reference to the middleware.
    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::WaitForMiddleware;
    use crate::wait_for::{wait_for, WaitFor, WAIT_FOR_ACTIONS};

    #[derive(Default)]
    struct TestState {
        log: Vec<&'static str>,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        First,
        Second,
        Wait(WaitFor),
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::First => "First",
                TestAction::Second => "Second",
                TestAction::Wait(_) => WAIT_FOR_ACTIONS,
            }
        }

        fn wait_for(&self) -> Option<&WaitFor> {
            match self {
                TestAction::Wait(request) => Some(request),
                _ => None,
            }
        }
    }

    fn test_reducer(state: &mut TestState, action: TestAction) {
        state.log.push(action.name());
    }

    #[test]
    fn store_dispatch_reaches_reducer() {
        let mut store = Store::new(TestState::default(), test_reducer);
        store.dispatch(TestAction::First);
        store.dispatch(TestAction::Second);
        assert_eq!(store.state().log, ["First", "Second"]);
    }

    #[test]
    fn store_state_mut() {
        let mut store = Store::new(TestState::default(), test_reducer);
        store.state_mut().log.push("manual");
        assert_eq!(store.state().log, ["manual"]);
    }

    #[tokio::test]
    async fn middleware_store_surfaces_the_wait_handle() {
        let mut store = StoreWithMiddleware::new(
            TestState::default(),
            test_reducer,
            WaitForMiddleware::new(),
        );

        assert!(store.dispatch(TestAction::First).is_none());

        let handle = store
            .dispatch(TestAction::Wait(wait_for(["Second"])))
            .expect("wait dispatch returns a handle");
        assert_eq!(store.middleware().len(), 1);

        assert!(store.dispatch(TestAction::Second).is_none());
        assert_eq!(handle.await, Ok(()));
        assert!(store.middleware().is_empty());

        // Every action, the wait request included, reached the reducer
        assert_eq!(
            store.state().log,
            ["First", WAIT_FOR_ACTIONS, "Second"]
        );
    }
}
