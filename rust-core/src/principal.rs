// Caller identity and the logical clock, both supplied by the invoking ledger.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Ledger height. Stamps records and drives certificate expiry.
pub type BlockHeight = u64;

pub type Hash = [u8; 32];

/// All-zeroes hash: "no previous entry".
pub const ZERO_HASH: Hash = [0u8; 32];

/// Opaque identity token: the 32-byte ed25519 public key of a caller.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Principal(pub [u8; 32]);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid principal hex (expected 32 bytes)")]
pub struct PrincipalParseError;

impl Principal {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Principal(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Principal {
    type Err = PrincipalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.trim(), &mut bytes).map_err(|_| PrincipalParseError)?;
        Ok(Principal(bytes))
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form keeps log lines readable.
        write!(f, "Principal({}..)", &self.to_hex()[..8])
    }
}

impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Inputs the environment hands to every operation: who is calling, and when.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Principal,
    pub block_height: BlockHeight,
}

impl CallContext {
    pub fn new(caller: Principal, block_height: BlockHeight) -> Self {
        CallContext {
            caller,
            block_height,
        }
    }
}
