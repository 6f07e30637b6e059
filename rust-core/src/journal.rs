// Append-only, hash-linked journal of successful registry mutations.
// Only successful operations append; a rejected call leaves it untouched.

use crate::encoding::{put_str, put_u64};
use crate::ids::{CertificateId, EntityId, MethodologyId, ReportId};
use crate::principal::{BlockHeight, CallContext, Hash, Principal, ZERO_HASH};
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    EntityRegistered {
        entity_id: EntityId,
    },
    EntityVerified {
        entity_id: EntityId,
    },
    MethodologyRegistered {
        methodology_id: MethodologyId,
    },
    MethodologyVerified {
        methodology_id: MethodologyId,
    },
    ReportSubmitted {
        report_id: ReportId,
        entity_id: EntityId,
    },
    ReportVerified {
        report_id: ReportId,
    },
    CertificateIssued {
        certificate_id: CertificateId,
        entity_id: EntityId,
        expiration_date: BlockHeight,
    },
    CertificateRevoked {
        certificate_id: CertificateId,
    },
    AdminTransferred {
        previous: Principal,
        new_admin: Principal,
    },
}

impl RegistryEvent {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64);
        match self {
            RegistryEvent::EntityRegistered { entity_id } => {
                out.push(1);
                put_str(&mut out, entity_id.as_str());
            }
            RegistryEvent::EntityVerified { entity_id } => {
                out.push(2);
                put_str(&mut out, entity_id.as_str());
            }
            RegistryEvent::MethodologyRegistered { methodology_id } => {
                out.push(3);
                put_str(&mut out, methodology_id.as_str());
            }
            RegistryEvent::MethodologyVerified { methodology_id } => {
                out.push(4);
                put_str(&mut out, methodology_id.as_str());
            }
            RegistryEvent::ReportSubmitted {
                report_id,
                entity_id,
            } => {
                out.push(5);
                put_str(&mut out, report_id.as_str());
                put_str(&mut out, entity_id.as_str());
            }
            RegistryEvent::ReportVerified { report_id } => {
                out.push(6);
                put_str(&mut out, report_id.as_str());
            }
            RegistryEvent::CertificateIssued {
                certificate_id,
                entity_id,
                expiration_date,
            } => {
                out.push(7);
                put_str(&mut out, certificate_id.as_str());
                put_str(&mut out, entity_id.as_str());
                put_u64(&mut out, *expiration_date);
            }
            RegistryEvent::CertificateRevoked { certificate_id } => {
                out.push(8);
                put_str(&mut out, certificate_id.as_str());
            }
            RegistryEvent::AdminTransferred {
                previous,
                new_admin,
            } => {
                out.push(9);
                out.extend_from_slice(previous.as_bytes());
                out.extend_from_slice(new_admin.as_bytes());
            }
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    pub seq: u64,
    pub block_height: BlockHeight,
    pub caller: Principal,
    pub event: RegistryEvent,
    #[serde(serialize_with = "hex::serde::serialize")]
    pub prev_hash: Hash,
    #[serde(serialize_with = "hex::serde::serialize")]
    pub hash: Hash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum JournalError {
    #[error("entry {seq} does not link to its predecessor")]
    BrokenLink { seq: u64 },
    #[error("entry {seq} hash does not match its contents")]
    HashMismatch { seq: u64 },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Journal {
            entries: Vec::new(),
        }
    }

    pub fn entry_hash(
        seq: u64,
        block_height: BlockHeight,
        caller: &Principal,
        prev_hash: &Hash,
        event: &RegistryEvent,
    ) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(seq.to_le_bytes());
        hasher.update(block_height.to_le_bytes());
        hasher.update(caller.as_bytes());
        hasher.update(prev_hash);
        hasher.update(event.canonical_bytes());
        hasher.finalize().into()
    }

    /// Append an event and return the new head hash.
    pub fn record(&mut self, ctx: &CallContext, event: RegistryEvent) -> Hash {
        let seq = self.entries.len() as u64;
        let prev_hash = self.head();
        let hash = Self::entry_hash(seq, ctx.block_height, &ctx.caller, &prev_hash, &event);
        self.entries.push(JournalEntry {
            seq,
            block_height: ctx.block_height,
            caller: ctx.caller,
            event,
            prev_hash,
            hash,
        });
        hash
    }

    /// Hash of the last entry; ZERO_HASH when empty.
    pub fn head(&self) -> Hash {
        self.entries.last().map_or(ZERO_HASH, |e| e.hash)
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recompute every link from the first entry.
    pub fn verify_chain(&self) -> Result<(), JournalError> {
        let mut prev = ZERO_HASH;
        for (i, e) in self.entries.iter().enumerate() {
            let seq = i as u64;
            if e.seq != seq || e.prev_hash != prev {
                return Err(JournalError::BrokenLink { seq });
            }
            let expected = Self::entry_hash(seq, e.block_height, &e.caller, &e.prev_hash, &e.event);
            if expected != e.hash {
                return Err(JournalError::HashMismatch { seq });
            }
            prev = e.hash;
        }
        Ok(())
    }

    /// Merkle root over entry hashes in journal order (odd tail paired with itself).
    /// None iff the journal is empty.
    pub fn merkle_root(&self) -> Option<Hash> {
        if self.entries.is_empty() {
            return None;
        }
        let mut level: Vec<Hash> = self.entries.iter().map(|e| e.hash).collect();

        while level.len() > 1 {
            let mut next: Vec<Hash> = Vec::with_capacity(level.len().div_ceil(2));
            for pair in level.chunks(2) {
                let a = pair[0];
                let b = pair.get(1).copied().unwrap_or(a);
                let mut hasher = Sha256::new();
                hasher.update(a);
                hasher.update(b);
                next.push(hasher.finalize().into());
            }
            level = next;
        }

        level.first().copied()
    }
}
