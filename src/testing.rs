//! Test doubles for exercising trees and dispatches.
//!
//! The tree is single-threaded by design, so these share state through
//! `Rc` rather than atomics:
//!
//! - [`CountingListener`]: counts invocations; clones share one counter
//! - [`RecordingListener`]: appends a label to a shared log per invocation
//! - [`FailingListener`]: fails every time, for abort-path tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::BoxError;
use crate::facade::EventFacade;
use crate::listener::Listener;

/// A listener that counts its invocations.
///
/// Clones share the same counter, so one handle can stay with the test
/// while another is registered on a node.
#[derive(Clone, Default)]
pub struct CountingListener {
    count: Rc<Cell<usize>>,
}

impl CountingListener {
    /// Create a listener with a zeroed counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of invocations so far.
    pub fn count(&self) -> usize {
        self.count.get()
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.set(0);
    }
}

impl<T> Listener<T> for CountingListener {
    fn on_event(&self, _ctx: &mut EventFacade<T>) -> Result<(), BoxError> {
        self.count.set(self.count.get() + 1);
        Ok(())
    }
}

/// A listener that appends its label to a shared log on every invocation,
/// for asserting notification order across a tree.
pub struct RecordingListener {
    label: String,
    log: Rc<RefCell<Vec<String>>>,
}

impl RecordingListener {
    /// Create a listener writing `label` into `log`.
    pub fn new(label: impl Into<String>, log: Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            label: label.into(),
            log,
        }
    }

    /// Convenience for a fresh shared log.
    pub fn log() -> Rc<RefCell<Vec<String>>> {
        Rc::new(RefCell::new(Vec::new()))
    }
}

impl<T> Listener<T> for RecordingListener {
    fn on_event(&self, _ctx: &mut EventFacade<T>) -> Result<(), BoxError> {
        self.log.borrow_mut().push(self.label.clone());
        Ok(())
    }
}

/// A listener that fails with the given message every time it runs.
pub struct FailingListener {
    message: String,
}

impl FailingListener {
    /// Create a listener failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl<T> Listener<T> for FailingListener {
    fn on_event(&self, _ctx: &mut EventFacade<T>) -> Result<(), BoxError> {
        Err(self.message.clone().into())
    }
}
