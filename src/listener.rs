//! The listener callback contract.
//!
//! A [`Listener`] receives the shared [`EventFacade`] whenever its event
//! reaches the node it is registered on. Plain closures implement the trait
//! through [`IntoListenerOutcome`], so both infallible and fallible
//! callbacks register without ceremony:
//!
//! ```
//! use bough::{BoxError, EventFacade, Node};
//!
//! let node = Node::new();
//! node.on("tick", |_: &mut EventFacade<Node>| {});
//! node.on("tick", |_: &mut EventFacade<Node>| -> Result<(), BoxError> {
//!     Ok(())
//! });
//! ```

use crate::error::BoxError;
use crate::facade::EventFacade;

/// A callback attached to a node under a single registry key.
///
/// `T` is the node handle type of the tree the listener participates in.
/// Returning `Err` aborts the remainder of the dispatch; the error reaches
/// the `fire` caller wrapped in
/// [`DispatchError::Listener`](crate::DispatchError::Listener).
pub trait Listener<T> {
    /// Called with the shared dispatch context.
    fn on_event(&self, ctx: &mut EventFacade<T>) -> Result<(), BoxError>;
}

/// Conversion from a callback's return value into the dispatch outcome.
///
/// Implemented for `()` (always continue) and for `Result<(), E>` where the
/// error boxes into [`BoxError`].
pub trait IntoListenerOutcome {
    /// Convert the output: `Ok` continues the traversal, `Err` aborts it.
    fn into_outcome(self) -> Result<(), BoxError>;
}

impl IntoListenerOutcome for () {
    fn into_outcome(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E> IntoListenerOutcome for Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}

// Any compatible closure is a listener.
impl<T, F, R> Listener<T> for F
where
    F: Fn(&mut EventFacade<T>) -> R,
    R: IntoListenerOutcome,
{
    fn on_event(&self, ctx: &mut EventFacade<T>) -> Result<(), BoxError> {
        self(ctx).into_outcome()
    }
}
