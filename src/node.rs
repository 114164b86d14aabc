//! The concrete tree node.
//!
//! A [`Node`] is a cheap clone-to-share handle. Children are owned in
//! attach order; the parent link is a non-owning back reference, so a
//! subtree is kept alive by its root handle and the chain above it can be
//! dropped independently. Equality is identity: two handles are equal when
//! they refer to the same node.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::dispatch;
use crate::emitter::{Emitter, NodeId};
use crate::error::{AttachError, DispatchError};
use crate::facade::{EventFacade, Params, Value};
use crate::listener::Listener;
use crate::phase;
use crate::registry::{ListenerId, Listeners};

/// A tree participant: listener registration, structural linkage, and event
/// dispatch.
#[derive(Clone)]
pub struct Node {
    inner: Rc<NodeInner>,
}

struct NodeInner {
    listeners: RefCell<Listeners<Node>>,
    parent: RefCell<Weak<NodeInner>>,
    children: RefCell<Vec<Node>>,
}

impl Node {
    /// Create a detached node with no listeners.
    pub fn new() -> Self {
        Node {
            inner: Rc::new(NodeInner {
                listeners: RefCell::new(Listeners::new()),
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(Vec::new()),
            }),
        }
    }

    // --- listener registration -------------------------------------------

    /// Register a listener under `event`.
    pub fn on(&self, event: impl Into<String>, listener: impl Listener<Node> + 'static) -> ListenerId {
        self.inner.listeners.borrow_mut().register(event, listener)
    }

    /// Register a listener under `event` that runs at most once.
    pub fn once(
        &self,
        event: impl Into<String>,
        listener: impl Listener<Node> + 'static,
    ) -> ListenerId {
        self.inner
            .listeners
            .borrow_mut()
            .register_once(event, listener)
    }

    /// Register a capture-phase listener: `before("x", f)` is
    /// `on("before x", f)`.
    pub fn before(&self, event: &str, listener: impl Listener<Node> + 'static) -> ListenerId {
        self.on(phase::before(event), listener)
    }

    /// Register a completion-phase listener: `after("x", f)` is
    /// `on("after x", f)`.
    pub fn after(&self, event: &str, listener: impl Listener<Node> + 'static) -> ListenerId {
        self.on(phase::after(event), listener)
    }

    /// One-shot [`before`](Node::before).
    pub fn once_before(&self, event: &str, listener: impl Listener<Node> + 'static) -> ListenerId {
        self.once(phase::before(event), listener)
    }

    /// One-shot [`after`](Node::after).
    pub fn once_after(&self, event: &str, listener: impl Listener<Node> + 'static) -> ListenerId {
        self.once(phase::after(event), listener)
    }

    /// Remove the registration identified by `id` under `event`.
    ///
    /// Phase-aliased registrations are removed under their qualified key,
    /// e.g. `off(&bough::phase::before("x"), id)`.
    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        self.inner.listeners.borrow_mut().unregister(event, id)
    }

    /// Number of listeners registered under `event` on this node.
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner.listeners.borrow().listener_count(event)
    }

    // --- structure -------------------------------------------------------

    /// Append `child` to this node's children and set its parent back
    /// reference, both in one step so the two directions never disagree.
    ///
    /// A child is reachable under at most one parent: attaching a node that
    /// already has a parent moves it (re-parenting replaces, never merges),
    /// and re-attaching under the same parent moves it to the end of the
    /// child order. Attaching a node to itself or to one of its own
    /// descendants is rejected, since the traversal has no other
    /// termination guard.
    pub fn attach(&self, child: &Node) -> Result<(), AttachError> {
        if Rc::ptr_eq(&self.inner, &child.inner) {
            return Err(AttachError::SelfAttach);
        }
        let mut cursor = self.parent();
        while let Some(ancestor) = cursor {
            if ancestor == *child {
                return Err(AttachError::Cycle);
            }
            cursor = ancestor.parent();
        }
        child.detach();
        *child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);
        self.inner.children.borrow_mut().push(child.clone());
        Ok(())
    }

    /// Symmetric convenience: `child.attach_to(parent)` is
    /// `parent.attach(child)`.
    pub fn attach_to(&self, parent: &Node) -> Result<(), AttachError> {
        parent.attach(self)
    }

    /// Remove this node from its parent's children and clear the back
    /// reference. No-op for a root.
    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent
                .inner
                .children
                .borrow_mut()
                .retain(|existing| !Rc::ptr_eq(&existing.inner, &self.inner));
        }
        *self.inner.parent.borrow_mut() = Weak::new();
    }

    /// The parent, if the back reference is set and still alive.
    pub fn parent(&self) -> Option<Node> {
        self.inner
            .parent
            .borrow()
            .upgrade()
            .map(|inner| Node { inner })
    }

    /// Snapshot of the children in attach order.
    pub fn children(&self) -> Vec<Node> {
        self.inner.children.borrow().clone()
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.inner.children.borrow().is_empty()
    }

    // --- dispatch --------------------------------------------------------

    /// Notify this node's listeners for a bare registry key, without any
    /// traversal. The propagating phases go through [`fire`](Node::fire).
    pub fn emit(&self, event: &str, ctx: &mut EventFacade<Node>) -> Result<(), DispatchError> {
        let batch = self.inner.listeners.borrow_mut().snapshot(event);
        for listener in batch {
            listener
                .on_event(ctx)
                .map_err(|source| DispatchError::Listener {
                    event: event.to_owned(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Dispatch `event` from this node and return the context's final
    /// value.
    ///
    /// Builds an [`EventFacade`] from `params` (an entry under
    /// [`VALUE_KEY`](crate::VALUE_KEY) seeds the value), runs the capture
    /// pass over this node's subtree and the bubble passes it seeds, and
    /// returns the value once every reachable node has been notified.
    pub fn fire(&self, event: &str, params: Params) -> Result<Option<Value>, DispatchError> {
        let mut ctx = EventFacade::new(params);
        self.fire_with(event, &mut ctx)?;
        Ok(ctx.take_value())
    }

    /// Dispatch `event` through a caller-built context.
    ///
    /// This is the forwarding form: successive dispatches can share one
    /// context, accumulating a value across them. The caller reads the
    /// result from the context afterwards.
    pub fn fire_with(&self, event: &str, ctx: &mut EventFacade<Node>) -> Result<(), DispatchError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(event, node = ?Emitter::id(self), "fire");
        dispatch::run(self, event, ctx)
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &Emitter::id(self))
            .field("children", &self.inner.children.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Emitter for Node {
    fn id(&self) -> NodeId {
        NodeId::new(Rc::as_ptr(&self.inner) as usize)
    }

    fn child(&self, index: usize) -> Option<Node> {
        self.inner.children.borrow().get(index).cloned()
    }

    fn has_children(&self) -> bool {
        !self.inner.children.borrow().is_empty()
    }

    fn parent(&self) -> Option<Node> {
        Node::parent(self)
    }

    fn notify(&self, event: &str, ctx: &mut EventFacade<Node>) -> Result<(), DispatchError> {
        self.emit(event, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::Node;
    use crate::error::AttachError;

    #[test]
    fn attach_links_both_directions() {
        let parent = Node::new();
        let child = Node::new();
        parent.attach(&child).unwrap();

        assert_eq!(child.parent(), Some(parent.clone()));
        assert_eq!(parent.children(), vec![child.clone()]);
        assert!(!parent.is_leaf());
        assert!(child.is_leaf());
    }

    #[test]
    fn reparenting_replaces_the_old_link() {
        let first = Node::new();
        let second = Node::new();
        let child = Node::new();

        first.attach(&child).unwrap();
        child.attach_to(&second).unwrap();

        assert_eq!(child.parent(), Some(second.clone()));
        assert!(first.children().is_empty());
        assert_eq!(second.children(), vec![child.clone()]);
    }

    #[test]
    fn reattaching_under_the_same_parent_moves_to_the_end() {
        let parent = Node::new();
        let first = Node::new();
        let second = Node::new();
        parent.attach(&first).unwrap();
        parent.attach(&second).unwrap();

        parent.attach(&first).unwrap();

        assert_eq!(parent.children(), vec![second, first]);
    }

    #[test]
    fn self_and_cycle_attachment_are_rejected() {
        let root = Node::new();
        let mid = Node::new();
        let leaf = Node::new();
        root.attach(&mid).unwrap();
        mid.attach(&leaf).unwrap();

        assert_eq!(root.attach(&root), Err(AttachError::SelfAttach));
        assert_eq!(leaf.attach(&root), Err(AttachError::Cycle));
        assert_eq!(mid.attach(&root), Err(AttachError::Cycle));

        // The rejected calls left the tree untouched.
        assert!(root.parent().is_none());
        assert_eq!(root.children(), vec![mid.clone()]);
        assert_eq!(mid.children(), vec![leaf]);
    }

    #[test]
    fn detach_is_a_no_op_for_roots() {
        let lone = Node::new();
        lone.detach();
        assert!(lone.parent().is_none());
    }

    #[test]
    fn dropping_the_parent_clears_the_back_reference() {
        let child = Node::new();
        {
            let parent = Node::new();
            parent.attach(&child).unwrap();
            assert!(child.parent().is_some());
        }
        assert!(child.parent().is_none());
    }

    #[test]
    fn off_removes_a_registration() {
        let node = Node::new();
        let id = node.on("ping", |_: &mut crate::EventFacade<Node>| {});
        assert_eq!(node.listener_count("ping"), 1);

        assert!(node.off("ping", id));
        assert!(!node.off("ping", id));
        assert_eq!(node.listener_count("ping"), 0);
    }
}
