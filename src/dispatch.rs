//! The capture/bubble engine.
//!
//! One dispatch is a downward capture pass followed by the bubble passes it
//! seeds. Capture notifies `before` listeners from the origin out to every
//! leaf of its subtree; each leaf reached then seeds two upward walks, one
//! for the primary event and one for its `after` phase, running from the
//! leaf to the tree root.
//!
//! Because every leaf seeds its own walk, the paths from sibling leaves
//! converge at shared ancestors. The [`Dispatch`] side table makes delivery
//! idempotent: a node is notified at most once per phase-qualified name per
//! dispatch, no matter how many paths reach it. The table is scoped to one
//! dispatch instance, so flags cannot leak across dispatches and a nested
//! `fire` of the same event is an independent full delivery.
//!
//! Within the origin's subtree, delivery at a node first pulls in any of
//! its children the dispatch has not bubbled yet. That keeps the primary
//! and `after` phases in strict leaf-to-root order under fan-in: when the
//! first converging branch reaches a shared ancestor, the ancestor's
//! remaining children are delivered before the ancestor itself. Above the
//! origin the walk notifies the ancestors themselves only; their other
//! subtrees are not part of the dispatch.

use std::collections::{HashMap, HashSet};

use crate::emitter::{Emitter, NodeId};
use crate::error::DispatchError;
use crate::facade::EventFacade;
use crate::phase;

/// Per-dispatch state: the shared context plus the bubble dedup table.
struct Dispatch<'a, E: Emitter> {
    ctx: &'a mut EventFacade<E>,
    origin: NodeId,
    bubbled: HashMap<NodeId, HashSet<String>>,
}

impl<'a, E: Emitter> Dispatch<'a, E> {
    fn new(ctx: &'a mut EventFacade<E>, origin: NodeId) -> Self {
        Self {
            ctx,
            origin,
            bubbled: HashMap::new(),
        }
    }

    fn has_bubbled(&self, node: &E, event: &str) -> bool {
        self.bubbled
            .get(&node.id())
            .is_some_and(|names| names.contains(event))
    }

    fn mark_bubbled(&mut self, node: &E, event: &str) {
        self.bubbled
            .entry(node.id())
            .or_default()
            .insert(event.to_owned());
    }
}

/// Run one full dispatch of `event` from `origin` through `ctx`.
pub(crate) fn run<E: Emitter>(
    origin: &E,
    event: &str,
    ctx: &mut EventFacade<E>,
) -> Result<(), DispatchError> {
    ctx.set_target(origin.clone());
    let mut dispatch = Dispatch::new(ctx, origin.id());
    capture(origin, event, &mut dispatch)
}

/// The downward pass: `before` notification at every node of the origin's
/// subtree, leaf detection, and bubble seeding.
fn capture<E: Emitter>(
    node: &E,
    event: &str,
    dispatch: &mut Dispatch<'_, E>,
) -> Result<(), DispatchError> {
    #[cfg(feature = "tracing")]
    tracing::trace!(event, node = ?node.id(), "capture");

    dispatch.ctx.set_current_target(node.clone());
    node.notify(&phase::before(event), dispatch.ctx)?;

    if node.has_children() {
        // Indexed walk, not a snapshot: children attached or detached by a
        // listener mid-dispatch take part in the remaining traversal.
        let mut index = 0;
        while let Some(child) = node.child(index) {
            capture(&child, event, dispatch)?;
            index += 1;
        }
    } else {
        // The only place bubbling is seeded: once per leaf reached.
        bubble(node, event, dispatch)?;
        bubble(node, &phase::after(event), dispatch)?;
    }
    Ok(())
}

/// The upward pass: walk from `node` to the tree root, delivering `event`
/// at every step the dedup guard has not yet seen.
///
/// The walk continues past already-delivered ancestors, because an
/// ancestor further up may still be waiting on its first delivery.
fn bubble<E: Emitter>(
    node: &E,
    event: &str,
    dispatch: &mut Dispatch<'_, E>,
) -> Result<(), DispatchError> {
    let mut cursor = node.clone();
    // Seeding leaves sit inside the origin's subtree, so the walk starts
    // inside and leaves it for good once it steps past the origin.
    let mut inside_origin = true;
    loop {
        if !dispatch.has_bubbled(&cursor, event) {
            deliver(&cursor, event, dispatch, inside_origin)?;
        }
        if cursor.id() == dispatch.origin {
            inside_origin = false;
        }
        match cursor.parent() {
            Some(parent) => cursor = parent,
            None => return Ok(()),
        }
    }
}

/// Guarded delivery of one phase-qualified name at one node.
///
/// Inside the origin's subtree, children the dispatch has not bubbled yet
/// come first; then the node's own listeners run, then the mark that
/// suppresses every later converging path.
fn deliver<E: Emitter>(
    node: &E,
    event: &str,
    dispatch: &mut Dispatch<'_, E>,
    descend: bool,
) -> Result<(), DispatchError> {
    if descend {
        let mut index = 0;
        while let Some(child) = node.child(index) {
            if !dispatch.has_bubbled(&child, event) {
                deliver(&child, event, dispatch, true)?;
            }
            index += 1;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(event, node = ?node.id(), "deliver");

    dispatch.ctx.set_current_target(node.clone());
    node.notify(event, dispatch.ctx)?;
    dispatch.mark_bubbled(node, event);
    Ok(())
}
