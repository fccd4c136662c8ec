// SPDX-License-Identifier: MIT

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

/// Session-scoped response cache keyed by canonical request signature.
///
/// Entries are never evicted and never overwritten: the first successful
/// response for a signature is what every later caller gets. Each signature
/// is backed by a `OnceCell`, which also de-duplicates concurrent identical
/// requests: a second caller awaits the in-flight fetch instead of issuing
/// its own.
#[derive(Debug, Default)]
pub struct RequestCache {
    cells: Mutex<HashMap<String, Arc<OnceCell<Value>>>>,
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cell backing a signature, created empty on first use.
    pub fn cell(&self, signature: &str) -> Arc<OnceCell<Value>> {
        let mut cells = self.cells.lock().expect("cache lock poisoned");
        cells.entry(signature.to_string()).or_default().clone()
    }

    pub fn get(&self, signature: &str) -> Option<Value> {
        let cells = self.cells.lock().expect("cache lock poisoned");
        cells.get(signature).and_then(|cell| cell.get().cloned())
    }

    /// Stores a value unless the signature already resolved; the first
    /// successful result is pinned for the whole session.
    pub fn put(&self, signature: &str, value: Value) {
        let _ = self.cell(signature).set(value);
    }

    /// Number of populated entries (in-flight cells are not counted).
    pub fn len(&self) -> usize {
        let cells = self.cells.lock().expect("cache lock poisoned");
        cells.values().filter(|cell| cell.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut cells = self.cells.lock().expect("cache lock poisoned");
        cells.clear();
    }
}
