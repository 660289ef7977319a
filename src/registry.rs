//! Opaque-handle registry
//!
//! Maps process-unique integer IDs to native resources so the host can store,
//! compare and pass them around as plain values. One registry per resource
//! namespace; IDs are monotonically increasing and never reused while the
//! bridge lives, so a deleted ID can only ever fail to resolve — it cannot
//! alias a different resource.

use crate::error::{BridgeError, BridgeResult};
use std::collections::HashMap;

/// ID table from opaque integer handles to native resources
///
/// The registry owns the mapping entry; the engine owns the memory behind the
/// resource. Removal returns the resource so the caller can hand it back to
/// the engine's destructor.
#[derive(Debug)]
pub struct HandleRegistry<R> {
    entries: HashMap<i32, R>,
    next_id: i32,
    namespace: &'static str,
}

impl<R> HandleRegistry<R> {
    /// Create an empty registry for the given resource namespace
    ///
    /// The namespace only appears in error messages.
    pub fn new(namespace: &'static str) -> Self {
        Self {
            entries: HashMap::new(),
            next_id: 0,
            namespace,
        }
    }

    /// Store a resource and return its freshly allocated ID
    pub fn insert(&mut self, resource: R) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(id, resource);
        id
    }

    /// Look up a resource by ID
    ///
    /// A missing ID is a caller bug (never inserted, or already deleted), not
    /// a transient condition.
    pub fn resolve(&self, id: i32) -> BridgeResult<&R> {
        self.entries.get(&id).ok_or_else(|| {
            BridgeError::not_found(format!("{} id {} not found", self.namespace, id))
        })
    }

    /// Remove a mapping, returning the resource for release
    ///
    /// Deleting an absent ID is an error, not a no-op — double-deletes should
    /// surface, not be swallowed.
    pub fn remove(&mut self, id: i32) -> BridgeResult<R> {
        self.entries.remove(&id).ok_or_else(|| {
            BridgeError::not_found(format!("{} id {} not found", self.namespace, id))
        })
    }

    /// Whether an ID currently resolves
    pub fn contains(&self, id: i32) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
