// Bounded per-owner index: owner key -> ids of dependent records, in insertion order.

use crate::error::IndexError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-owner cap used by the report and certificate indexes.
pub const MAX_INDEX_ENTRIES: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IndexList<K: Ord, V> {
    lists: BTreeMap<K, Vec<V>>,
    capacity: usize,
}

impl<K: Ord, V> IndexList<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(MAX_INDEX_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        IndexList {
            lists: BTreeMap::new(),
            capacity,
        }
    }

    /// Fails iff `owner` already holds `capacity` ids. Read-only.
    pub fn ensure_room(&self, owner: &K) -> Result<(), IndexError> {
        let used = self.lists.get(owner).map_or(0, Vec::len);
        if used >= self.capacity {
            return Err(IndexError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    pub fn append(&mut self, owner: K, id: V) -> Result<(), IndexError> {
        self.ensure_room(&owner)?;
        self.lists.entry(owner).or_default().push(id);
        Ok(())
    }

    pub fn lookup(&self, owner: &K) -> Option<&[V]> {
        self.lists.get(owner).map(Vec::as_slice)
    }
}

impl<K: Ord, V> Default for IndexList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
