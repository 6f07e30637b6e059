// Keyed registry: unique-id creation, existence-checked status advancement,
// authorization-gated mutation. Generic over key, record shape and lifecycle.

use crate::error::{AdvanceError, CreateError};
use crate::guard::AuthorizationGuard;
use crate::lifecycle::Lifecycle;
use crate::principal::{BlockHeight, CallContext};
use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};

/// A record that carries a lifecycle status.
pub trait Record {
    type Status: Lifecycle;

    fn status(&self) -> Self::Status;
    fn status_mut(&mut self) -> &mut Self::Status;
}

/// What the registry hands a record builder on creation: the clock reading to
/// stamp and the lifecycle's initial status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stamp<S> {
    pub at: BlockHeight,
    pub status: S,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyedRegistry<K: Ord, R> {
    records: BTreeMap<K, R>,
}

/// A free slot that passed authorization and the duplicate check.
/// Dropping it leaves the registry untouched.
pub struct VacantRecord<'a, K: Ord, R> {
    entry: btree_map::VacantEntry<'a, K, R>,
    at: BlockHeight,
}

impl<'a, K: Ord, R: Record> VacantRecord<'a, K, R> {
    pub fn key(&self) -> &K {
        self.entry.key()
    }

    pub fn insert(self, build: impl FnOnce(Stamp<R::Status>) -> R) -> &'a mut R {
        let record = build(Stamp {
            at: self.at,
            status: R::Status::INITIAL,
        });
        self.entry.insert(record)
    }
}

impl<K: Ord, R: Record> KeyedRegistry<K, R> {
    pub fn new() -> Self {
        KeyedRegistry {
            records: BTreeMap::new(),
        }
    }

    /// Authorize, then claim `id`. The record is only written by
    /// [`VacantRecord::insert`], so callers can run further checks in between.
    pub fn reserve(
        &mut self,
        guard: &AuthorizationGuard,
        ctx: &CallContext,
        id: K,
    ) -> Result<VacantRecord<'_, K, R>, CreateError> {
        guard.authorize(&ctx.caller)?;
        match self.records.entry(id) {
            btree_map::Entry::Occupied(_) => Err(CreateError::DuplicateId),
            btree_map::Entry::Vacant(entry) => Ok(VacantRecord {
                entry,
                at: ctx.block_height,
            }),
        }
    }

    pub fn create(
        &mut self,
        guard: &AuthorizationGuard,
        ctx: &CallContext,
        id: K,
        build: impl FnOnce(Stamp<R::Status>) -> R,
    ) -> Result<(), CreateError> {
        self.reserve(guard, ctx, id)?.insert(build);
        Ok(())
    }

    /// Move the record to its successor status. Advancing a terminal record
    /// succeeds and changes nothing.
    pub fn advance_status(
        &mut self,
        guard: &AuthorizationGuard,
        ctx: &CallContext,
        id: &K,
    ) -> Result<(), AdvanceError> {
        guard.authorize(&ctx.caller)?;
        let record = self.records.get_mut(id).ok_or(AdvanceError::NotFound)?;
        let next = record.status().next();
        *record.status_mut() = next;
        Ok(())
    }

    pub fn get(&self, id: &K) -> Option<&R> {
        self.records.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<K: Ord, R: Record> Default for KeyedRegistry<K, R> {
    fn default() -> Self {
        Self::new()
    }
}
