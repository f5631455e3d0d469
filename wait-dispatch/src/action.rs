//! Action trait for dispatchable events

use std::fmt::Debug;

use crate::wait_for::WaitFor;

/// Marker trait for actions that can flow through the dispatch pipeline
///
/// Actions represent events delivered to the store. They should be:
/// - Clone: Actions may be logged, replayed, or forwarded through middleware
/// - Debug: For debugging and logging
/// - Send + 'static: For async dispatch across tasks
///
/// The middleware identifies an action by its [`name`](Action::name), an
/// opaque string compared against the conditions of outstanding wait
/// requests.
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for matching, logging and filtering
    fn name(&self) -> &'static str;

    /// Surface an embedded wait request, if this action carries one.
    ///
    /// An action enum that wants to request waits embeds a [`WaitFor`]
    /// record in one of its variants and returns it here; by convention
    /// that variant's [`name`](Action::name) is
    /// [`WAIT_FOR_ACTIONS`](crate::WAIT_FOR_ACTIONS). Ordinary actions use
    /// the default.
    ///
    /// # Example
    /// ```ignore
    /// #[derive(Clone, Debug)]
    /// enum AppAction {
    ///     UserDidLoad,
    ///     Wait(WaitFor),
    /// }
    ///
    /// impl Action for AppAction {
    ///     fn name(&self) -> &'static str {
    ///         match self {
    ///             AppAction::UserDidLoad => "UserDidLoad",
    ///             AppAction::Wait(_) => WAIT_FOR_ACTIONS,
    ///         }
    ///     }
    ///
    ///     fn wait_for(&self) -> Option<&WaitFor> {
    ///         match self {
    ///             AppAction::Wait(request) => Some(request),
    ///             _ => None,
    ///         }
    ///     }
    /// }
    /// ```
    fn wait_for(&self) -> Option<&WaitFor> {
        None
    }
}
