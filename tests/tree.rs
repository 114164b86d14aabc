//! Structural operations and their effect on dispatch paths.

use bough::testing::CountingListener;
use bough::{AttachError, Node, Params};

#[test]
fn reparenting_redirects_the_bubble_path() {
    let first_parent = Node::new();
    let second_parent = Node::new();
    let child = Node::new();
    first_parent.attach(&child).unwrap();

    let first_primary = CountingListener::new();
    let second_primary = CountingListener::new();
    first_parent.on("ping", first_primary.clone());
    second_parent.on("ping", second_primary.clone());

    child.fire("ping", Params::new()).unwrap();
    assert_eq!(first_primary.count(), 1);
    assert_eq!(second_primary.count(), 0);

    // attach re-parents in one step; the old parent is off the path from
    // the next dispatch onwards.
    second_parent.attach(&child).unwrap();

    child.fire("ping", Params::new()).unwrap();
    assert_eq!(first_primary.count(), 1);
    assert_eq!(second_primary.count(), 1);
}

#[test]
fn detached_subtrees_dispatch_on_their_own() {
    let root = Node::new();
    let branch = Node::new();
    let leaf = Node::new();
    root.attach(&branch).unwrap();
    branch.attach(&leaf).unwrap();

    let root_primary = CountingListener::new();
    let branch_primary = CountingListener::new();
    root.on("ping", root_primary.clone());
    branch.on("ping", branch_primary.clone());

    branch.detach();
    branch.fire("ping", Params::new()).unwrap();

    assert_eq!(branch_primary.count(), 1);
    assert_eq!(root_primary.count(), 0);
    assert!(root.children().is_empty());
}

#[test]
fn cycle_rejection_keeps_the_tree_dispatchable() {
    let root = Node::new();
    let mid = Node::new();
    let leaf = Node::new();
    root.attach(&mid).unwrap();
    mid.attach(&leaf).unwrap();

    assert_eq!(leaf.attach(&root), Err(AttachError::Cycle));
    assert_eq!(root.attach(&root), Err(AttachError::SelfAttach));

    let counter = CountingListener::new();
    root.on("ping", counter.clone());
    root.fire("ping", Params::new()).unwrap();
    assert_eq!(counter.count(), 1);
}

#[test]
fn attach_order_is_capture_order() {
    let root = Node::new();
    let first = Node::new();
    let second = Node::new();
    root.attach(&first).unwrap();
    root.attach(&second).unwrap();

    assert_eq!(root.children(), vec![first.clone(), second.clone()]);

    // Re-attaching moves a child to the end rather than duplicating it.
    root.attach(&first).unwrap();
    assert_eq!(root.children(), vec![second, first]);
}
