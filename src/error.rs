//! Error types.
//!
//! A small structured hierarchy using `thiserror`:
//!
//! - [`BoughError`] - top-level error for callers composing several operations
//! - [`DispatchError`] - a dispatch was aborted
//! - [`AttachError`] - a structural operation was rejected

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all bough operations.
#[derive(Error, Debug)]
pub enum BoughError {
    /// An event dispatch was aborted.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// A structural tree operation was rejected.
    #[error("attach error: {0}")]
    Attach(#[from] AttachError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors that abort an event dispatch.
///
/// There is no partial-dispatch recovery: the first failing listener ends
/// the traversal and nodes later in traversal order see nothing.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A listener returned an error.
    #[error("listener failed during `{event}`")]
    Listener {
        /// The phase-qualified registry key being notified when the
        /// listener failed.
        event: String,
        /// The listener's error.
        #[source]
        source: BoxError,
    },
}

/// Errors from structural tree operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AttachError {
    /// A node cannot be attached to itself.
    #[error("a node cannot be attached to itself")]
    SelfAttach,

    /// Attaching would make a node its own ancestor. The recursive
    /// traversal has no other termination guard, so cycles are rejected
    /// here.
    #[error("attaching would make a node its own ancestor")]
    Cycle,
}

// Convenience conversion
impl From<BoxError> for BoughError {
    fn from(err: BoxError) -> Self {
        BoughError::Custom(err)
    }
}
