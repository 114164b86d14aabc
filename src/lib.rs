//! # bough - Hierarchical Event Propagation
//!
//! `bough` dispatches events through a tree of emitter nodes in two phases:
//! a downward **capture** pass that notifies `before` listeners from the
//! dispatch origin out to every leaf, and upward **bubble** passes, seeded
//! once per leaf, that notify primary and `after` listeners from each leaf
//! back to the tree root.
//!
//! The part with teeth is duplicate suppression: when several leaves share
//! an ancestor, their bubble paths converge, and naive recursion would
//! notify that ancestor once per leaf beneath it. A dispatch-scoped dedup
//! guard makes delivery idempotent instead: every node observes each phase
//! of a given event exactly once per dispatch, regardless of fan-in.
//!
//! ## Quick Start
//!
//! ```
//! use bough::{EventFacade, Node, Params};
//!
//! let root = Node::new();
//! let leaf = Node::new();
//! root.attach(&leaf)?;
//!
//! root.before("render", |ctx: &mut EventFacade<Node>| {
//!     ctx.set_value(Vec::<String>::new());
//! });
//! leaf.on("render", |ctx: &mut EventFacade<Node>| {
//!     if let Some(parts) = ctx.value_as_mut::<Vec<String>>() {
//!         parts.push("leaf".to_owned());
//!     }
//! });
//!
//! let value = root.fire("render", Params::new())?;
//! let parts = value.unwrap().downcast::<Vec<String>>().unwrap();
//! assert_eq!(*parts, vec!["leaf".to_owned()]);
//! # Ok::<(), bough::BoughError>(())
//! ```
//!
//! ## Layers
//!
//! - [`Listeners`]: the per-node registry primitive (register, one-shot
//!   registration, removal by [`ListenerId`], synchronous notify-all in
//!   registration order).
//! - [`EventFacade`]: the mutable context threaded through one dispatch,
//!   carrying the evolving result value, the caller's opaque params, the
//!   dispatch origin and the node currently executing listeners.
//! - [`Node`]: the tree participant. Children are owned in attach order;
//!   the parent link is a non-owning back reference. `attach` keeps both
//!   directions consistent and rejects cycles.
//! - [`Emitter`]: the capability contract the engine traverses through.
//!   The dispatch algorithm never probes structure dynamically; anything
//!   that implements `Emitter` can participate.
//!
//! ## Execution model
//!
//! Dispatch is fully synchronous, single-threaded and re-entrant. A
//! listener runs to completion before traversal continues, may mutate the
//! context value or the tree itself (mutations stay visible to the rest of
//! the traversal), and aborts the dispatch by returning an error. Dedup
//! state lives in the dispatch instance, so nested `fire` calls never
//! observe each other's guard flags.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod dispatch;
mod emitter;
mod error;
mod facade;
mod listener;
mod node;
pub mod phase;
mod registry;
pub mod testing;

pub use emitter::{Emitter, NodeId};
pub use error::{AttachError, BoughError, BoxError, DispatchError};
pub use facade::{EventFacade, Params, VALUE_KEY, Value};
pub use listener::{IntoListenerOutcome, Listener};
pub use node::Node;
pub use registry::{ListenerId, Listeners};

/// Common imports for working with bough.
///
/// ```
/// use bough::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoughError, BoxError, DispatchError, Emitter, EventFacade, Listener, ListenerId, Node,
        Params,
    };
}
