//! Await dispatched actions in Redux-style Rust stores
//!
//! This crate provides a middleware that lets a caller dispatch a wait
//! request and receive a future that settles only after a specified set of
//! other actions has flowed through the same dispatch pipeline. It exists to
//! synchronize a caller with asynchronous side effects completed by other
//! handlers - the classic case being server-side rendering, which cannot
//! finish until app state is ready.
//!
//! # Core Concepts
//!
//! - **Action**: Events flowing through the dispatch pipeline, identified by
//!   an opaque name
//! - **WaitFor**: A request to wait for a set of action names, with timeout
//!   and optional error action
//! - **WaitHandle**: A future returned to the dispatcher of a wait request
//! - **WaitForMiddleware**: The interceptor that matches every dispatched
//!   action against outstanding waits
//! - **Store**: A minimal host pipeline for demos and tests
//!
//! # Basic Example
//!
//! ```ignore
//! use wait_dispatch::prelude::*;
//!
//! #[derive(Clone, Debug)]
//! enum AppAction {
//!     UserDidLoad,
//!     PostsDidLoad,
//!     Wait(WaitFor),
//! }
//!
//! impl Action for AppAction {
//!     fn name(&self) -> &'static str {
//!         match self {
//!             AppAction::UserDidLoad => "UserDidLoad",
//!             AppAction::PostsDidLoad => "PostsDidLoad",
//!             AppAction::Wait(_) => WAIT_FOR_ACTIONS,
//!         }
//!     }
//!
//!     fn wait_for(&self) -> Option<&WaitFor> {
//!         match self {
//!             AppAction::Wait(request) => Some(request),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut store = StoreWithMiddleware::new(state, reducer, WaitForMiddleware::new());
//!
//! let handle = store
//!     .dispatch(AppAction::Wait(wait_for(["UserDidLoad", "PostsDidLoad"])))
//!     .expect("wait dispatch returns a handle");
//!
//! // Async handlers dispatch UserDidLoad / PostsDidLoad as they finish...
//! handle.await?;
//! // All awaited actions have been dispatched; state is ready.
//! ```
//!
//! # Failure Modes
//!
//! A wait settles exactly once, in one of three ways:
//!
//! 1. **Resolved**: every condition was observed at least once
//! 2. **Error action** ([`WaitError::ErrorAction`]): the designated error
//!    action arrived first
//! 3. **Timeout** ([`WaitError::TimedOut`]): the timeout (default 10s)
//!    elapsed with conditions still unmet
//!
//! Rejections never surface as panics inside the dispatch path; they travel
//! through the handle and are mirrored to `tracing` at warn level.

pub mod action;
pub mod deferred;
pub mod middleware;
pub mod store;
pub mod testing;
pub mod wait_for;

mod tracker;

// Core trait exports
pub use action::Action;

// Wait request exports
pub use wait_for::{wait_for, IntoConditions, WaitFor, DEFAULT_TIMEOUT, WAIT_FOR_ACTIONS};

// Handle exports
pub use deferred::{Deferred, WaitError, WaitHandle};

// Middleware exports
pub use middleware::{Chain, LoggingMiddleware, Middleware, Next, NoopMiddleware, WaitForMiddleware};
pub use tracker::PendingWait;

// Store exports
pub use store::{Reducer, Store, StoreWithMiddleware};

// Testing exports
pub use testing::MockStore;

#[cfg(feature = "testing-time")]
pub use testing::{advance_time, pause_time, resume_time};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::Action;
    pub use crate::deferred::{WaitError, WaitHandle};
    pub use crate::middleware::{
        Chain, LoggingMiddleware, Middleware, Next, NoopMiddleware, WaitForMiddleware,
    };
    pub use crate::store::{Reducer, Store, StoreWithMiddleware};
    pub use crate::wait_for::{wait_for, WaitFor, DEFAULT_TIMEOUT, WAIT_FOR_ACTIONS};
    pub use crate::PendingWait;
}
