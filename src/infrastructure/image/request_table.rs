//! Target → desired URL table.
//!
//! The table, not the intake queue, is the single source of truth for
//! whether a request is still wanted. Entries are overwritten on every new
//! request for a target and are never removed when a request completes.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::domain::entities::TargetHandle;

/// Concurrent mapping from target handle to its currently desired URL.
#[derive(Debug)]
pub struct RequestTable<T> {
    requests: RwLock<HashMap<T, String>>,
}

impl<T: TargetHandle> RequestTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            requests: RwLock::new(HashMap::new()),
        }
    }

    /// Records `url` as the only URL wanted for `target`.
    /// Returns the URL it replaced, if any.
    pub fn insert(&self, target: T, url: impl Into<String>) -> Option<String> {
        self.requests.write().insert(target, url.into())
    }

    /// Returns the URL currently wanted for `target`.
    #[must_use]
    pub fn get(&self, target: &T) -> Option<String> {
        self.requests.read().get(target).cloned()
    }

    /// Returns true if `target` still wants exactly `url`.
    #[must_use]
    pub fn is_current(&self, target: &T, url: &str) -> bool {
        self.requests
            .read()
            .get(target)
            .is_some_and(|current| current == url)
    }

    /// Forgets the request for `target`.
    pub fn remove(&self, target: &T) -> Option<String> {
        self.requests.write().remove(target)
    }

    /// Returns the number of tracked targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.read().len()
    }

    /// Returns true if no target is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every request.
    pub fn clear(&self) {
        self.requests.write().clear();
    }
}

impl<T: TargetHandle> Default for RequestTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
