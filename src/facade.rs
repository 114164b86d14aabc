//! The event context threaded through one dispatch.
//!
//! An [`EventFacade`] is created once per `fire` call (or supplied pre-built
//! by the caller), mutated by listeners and the engine throughout one full
//! dispatch, and read back afterwards. It carries:
//!
//! - `value`: the evolving result of the event, dynamically typed because
//!   one tree dispatches events whose results have different types over its
//!   lifetime
//! - `params`: an opaque read-only mapping supplied by the caller
//! - `target`: the node the dispatch was initiated on
//! - `current_target`: the node whose listeners are currently executing
//!
//! The target fields are engine-managed; listener code should treat them as
//! read-only.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// Dynamically typed value carried by an [`EventFacade`].
pub type Value = Box<dyn Any>;

/// Reserved [`Params`] key whose entry seeds the facade's initial value.
pub const VALUE_KEY: &str = "value";

/// Opaque string-keyed parameter mapping supplied by the caller of a
/// dispatch.
///
/// All keys other than [`VALUE_KEY`] are preserved verbatim and visible to
/// every listener through [`EventFacade::params`].
#[derive(Default)]
pub struct Params {
    entries: HashMap<String, Value>,
}

impl Params {
    /// Create an empty parameter mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    ///
    /// ```
    /// use bough::Params;
    ///
    /// let params = Params::new().with("attempt", 2u32).with("dry_run", true);
    /// assert_eq!(params.get::<u32>("attempt"), Some(&2));
    /// ```
    pub fn with(mut self, key: impl Into<String>, value: impl Any) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert an entry, replacing any previous entry under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Any) {
        self.entries.insert(key.into(), Box::new(value));
    }

    /// Look up an entry and downcast it to `V`.
    ///
    /// Returns `None` if the key is absent or holds a different type.
    pub fn get<V: Any>(&self, key: &str) -> Option<&V> {
        self.entries.get(key)?.downcast_ref()
    }

    /// Whether an entry exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove and return the raw entry under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// The mutable carrier object shared by every listener of one dispatch.
///
/// Generic over the node handle type `T` so the engine can record the
/// dispatch origin and the node currently being processed; within a tree of
/// [`Node`](crate::Node)s that is `EventFacade<Node>`.
pub struct EventFacade<T> {
    value: Option<Value>,
    params: Params,
    target: Option<T>,
    current_target: Option<T>,
}

impl<T> EventFacade<T> {
    /// Build a facade from caller parameters.
    ///
    /// An entry under [`VALUE_KEY`] is removed from the params and becomes
    /// the initial value.
    pub fn new(mut params: Params) -> Self {
        let value = params.remove(VALUE_KEY);
        Self {
            value,
            params,
            target: None,
            current_target: None,
        }
    }

    /// Set the result value.
    ///
    /// Note that `value` is stored as-is: passing an already-boxed
    /// [`Value`] nests the box.
    pub fn set_value(&mut self, value: impl Any) {
        self.value = Some(Box::new(value));
    }

    /// Whether a result value has been set.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Borrow the result value, if set.
    pub fn value(&self) -> Option<&dyn Any> {
        self.value.as_deref()
    }

    /// Borrow the result value downcast to `V`.
    pub fn value_as<V: Any>(&self) -> Option<&V> {
        self.value.as_deref()?.downcast_ref()
    }

    /// Mutably borrow the result value downcast to `V`.
    pub fn value_as_mut<V: Any>(&mut self) -> Option<&mut V> {
        self.value.as_deref_mut()?.downcast_mut()
    }

    /// Take the result value out of the facade.
    pub fn take_value(&mut self) -> Option<Value> {
        self.value.take()
    }

    /// The caller-supplied parameter mapping.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Mutable access to the parameter mapping.
    ///
    /// Params are read-only by convention; mutation is visible to every
    /// later listener of the dispatch.
    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// The node the dispatch was initiated on. `None` outside a dispatch.
    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    /// The node whose listeners are currently executing.
    pub fn current_target(&self) -> Option<&T> {
        self.current_target.as_ref()
    }

    pub(crate) fn set_target(&mut self, node: T) {
        self.target = Some(node);
    }

    pub(crate) fn set_current_target(&mut self, node: T) {
        self.current_target = Some(node);
    }
}

impl<T> Default for EventFacade<T> {
    fn default() -> Self {
        Self::new(Params::new())
    }
}

impl<T> fmt::Debug for EventFacade<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventFacade")
            .field("has_value", &self.value.is_some())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
