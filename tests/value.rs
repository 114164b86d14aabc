//! Value threading and context semantics across a dispatch.

use std::cell::Cell;
use std::rc::Rc;

use bough::{EventFacade, Node, Params};

#[test]
fn value_accumulates_across_phases_and_fire_returns_it() {
    let node = Node::new();

    node.before("assemble", |ctx: &mut EventFacade<Node>| {
        ctx.set_value(Vec::<String>::new());
    });
    node.on("assemble", |ctx: &mut EventFacade<Node>| {
        if let Some(parts) = ctx.value_as_mut::<Vec<String>>() {
            parts.push("face".to_owned());
        }
    });
    node.on("assemble", |ctx: &mut EventFacade<Node>| {
        if let Some(parts) = ctx.value_as_mut::<Vec<String>>() {
            parts.push("brungle".to_owned());
        }
    });
    node.after("assemble", |ctx: &mut EventFacade<Node>| {
        let joined = ctx.value_as::<Vec<String>>().map(|parts| parts.join(" - "));
        if let Some(joined) = joined {
            ctx.set_value(joined);
        }
    });

    let value = node.fire("assemble", Params::new()).unwrap();
    let joined = value.unwrap().downcast::<String>().unwrap();
    assert_eq!(*joined, "face - brungle");
}

#[test]
fn params_are_visible_verbatim_and_the_reserved_key_seeds_the_value() {
    let node = Node::new();
    let observed = Rc::new(Cell::new(false));

    let observed_flag = Rc::clone(&observed);
    node.on("configure", move |ctx: &mut EventFacade<Node>| {
        assert_eq!(ctx.params().get::<u32>("attempt"), Some(&7));
        assert!(!ctx.params().contains("value"));
        assert_eq!(ctx.value_as::<String>().map(String::as_str), Some("seed"));
        observed_flag.set(true);
    });

    let params = Params::new()
        .with("attempt", 7u32)
        .with("value", String::from("seed"));
    let value = node.fire("configure", params).unwrap();

    assert!(observed.get());
    assert_eq!(*value.unwrap().downcast::<String>().unwrap(), "seed");
}

#[test]
fn target_stays_the_origin_while_current_target_tracks_the_walk() {
    let root = Node::new();
    let leaf = Node::new();
    root.attach(&leaf).unwrap();

    let checked = Rc::new(Cell::new(0u32));

    let root_handle = root.clone();
    let leaf_handle = leaf.clone();
    let checked_at_leaf = Rc::clone(&checked);
    leaf.on("inspect", move |ctx: &mut EventFacade<Node>| {
        assert_eq!(ctx.target(), Some(&root_handle));
        assert_eq!(ctx.current_target(), Some(&leaf_handle));
        checked_at_leaf.set(checked_at_leaf.get() + 1);
    });

    let root_handle = root.clone();
    let checked_at_root = Rc::clone(&checked);
    root.on("inspect", move |ctx: &mut EventFacade<Node>| {
        assert_eq!(ctx.target(), Some(&root_handle));
        assert_eq!(ctx.current_target(), Some(&root_handle));
        checked_at_root.set(checked_at_root.get() + 1);
    });

    root.fire("inspect", Params::new()).unwrap();
    assert_eq!(checked.get(), 2);
}

#[test]
fn a_caller_built_context_is_used_as_is() {
    let node = Node::new();
    node.on("bump", |ctx: &mut EventFacade<Node>| {
        if let Some(total) = ctx.value_as_mut::<u32>() {
            *total += 1;
        } else {
            ctx.set_value(1u32);
        }
    });

    let mut ctx = EventFacade::new(Params::new());
    node.fire_with("bump", &mut ctx).unwrap();
    node.fire_with("bump", &mut ctx).unwrap();

    // The shared context accumulated across both dispatches.
    assert_eq!(ctx.value_as::<u32>(), Some(&2));
    assert_eq!(ctx.target(), Some(&node));
}

#[test]
fn fire_without_listeners_returns_no_value() {
    let node = Node::new();
    let value = node.fire("silence", Params::new()).unwrap();
    assert!(value.is_none());
}
