//! Wait request record and constructors

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Conventional [`Action::name`](crate::Action::name) for actions that carry
/// a [`WaitFor`] record.
pub const WAIT_FOR_ACTIONS: &str = "WAIT_FOR_ACTIONS";

/// Timeout applied when a wait request does not specify one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// A request to wait until a set of actions has been dispatched.
///
/// Dispatching an action carrying a `WaitFor` record through a store
/// equipped with [`WaitForMiddleware`](crate::WaitForMiddleware) returns a
/// [`WaitHandle`](crate::WaitHandle) that settles once every condition has
/// been observed, an error action arrives, or the timeout elapses.
///
/// The record is immutable once constructed. Dispatching an equal-looking
/// record again creates a second, independent wait.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use wait_dispatch::wait_for;
///
/// let request = wait_for(["UserDidLoad", "PostsDidLoad"])
///     .with_timeout(Duration::from_secs(5))
///     .with_error_action("FetchDidError");
///
/// assert_eq!(request.conditions(), ["UserDidLoad", "PostsDidLoad"]);
/// assert_eq!(request.error_action(), Some("FetchDidError"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitFor {
    conditions: Vec<String>,
    timeout: Duration,
    error_action: Option<String>,
}

impl WaitFor {
    /// Create a wait request for the given action name(s).
    ///
    /// Accepts a single name or a sequence; a lone name is normalized to a
    /// one-element sequence. The timeout defaults to
    /// [`DEFAULT_TIMEOUT`].
    pub fn new(conditions: impl IntoConditions) -> Self {
        Self {
            conditions: conditions.into_conditions(),
            timeout: DEFAULT_TIMEOUT,
            error_action: None,
        }
    }

    /// Set the timeout after which the wait is rejected.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set an action name that rejects the wait early if dispatched before
    /// all conditions are met.
    pub fn with_error_action(mut self, action: impl Into<String>) -> Self {
        self.error_action = Some(action.into());
        self
    }

    /// The action names that must each be observed for the wait to resolve.
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    /// The configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The early-rejection action name, if any.
    pub fn error_action(&self) -> Option<&str> {
        self.error_action.as_deref()
    }
}

/// Create a [`WaitFor`] request for the given action name(s).
///
/// Shorthand for [`WaitFor::new`].
///
/// # Example
/// ```
/// use wait_dispatch::wait_for;
///
/// // A single name is normalized to a one-element sequence
/// assert_eq!(wait_for("UserDidLoad").conditions(), ["UserDidLoad"]);
/// ```
pub fn wait_for(conditions: impl IntoConditions) -> WaitFor {
    WaitFor::new(conditions)
}

/// Conversion into a normalized condition sequence.
///
/// Implemented for a lone action name (`&str`, `String`) and for sequences
/// of names (vectors, slices, arrays).
pub trait IntoConditions {
    /// Produce the normalized sequence of action names.
    fn into_conditions(self) -> Vec<String>;
}

impl IntoConditions for &str {
    fn into_conditions(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoConditions for String {
    fn into_conditions(self) -> Vec<String> {
        vec![self]
    }
}

impl<T: Into<String>> IntoConditions for Vec<T> {
    fn into_conditions(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<String> + Clone> IntoConditions for &[T] {
    fn into_conditions(self) -> Vec<String> {
        self.iter().cloned().map(Into::into).collect()
    }
}

impl<T: Into<String>, const N: usize> IntoConditions for [T; N] {
    fn into_conditions(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}
