// Validation of incoming calls: ed25519 signature by the claimed caller over a
// chain-bound, nonce-bearing digest, and a logical clock that never runs
// backwards. Deterministic, in-memory.

use crate::call::Call;
use crate::encoding::{put_str, put_u64};
use crate::principal::{BlockHeight, CallContext, Principal};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// A call as delivered by the ledger: who sent it, the sender's nonce, what it
/// asks for, and the sender's signature (hex) over `signing_digest`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCall {
    pub caller: Principal,
    pub nonce: u64,
    pub call: Call,
    pub signature: String,
}

impl SignedCall {
    /// SHA-256 over chain_id || caller || nonce || canonical call bytes.
    pub fn signing_digest(chain_id: &str, caller: &Principal, nonce: u64, call: &Call) -> [u8; 32] {
        let mut bytes = Vec::new();
        put_str(&mut bytes, chain_id);
        bytes.extend_from_slice(caller.as_bytes());
        put_u64(&mut bytes, nonce);
        bytes.extend_from_slice(&call.canonical_bytes());
        Sha256::digest(&bytes).into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("replayed call: nonce {nonce} from {caller} already used")]
    Replayed { caller: Principal, nonce: u64 },
    #[error("clock went backwards: last height {last}, got {got}")]
    ClockRegressed { last: BlockHeight, got: BlockHeight },
}

/// Per-chain validator state. Nonces must strictly increase per caller; gaps
/// are allowed.
#[derive(Clone, Debug)]
pub struct ValidationContext {
    pub chain_id: String,
    pub last_height: BlockHeight,
    last_nonce: BTreeMap<Principal, u64>,
}

impl ValidationContext {
    pub fn new(chain_id: impl Into<String>, start_height: BlockHeight) -> Self {
        ValidationContext {
            chain_id: chain_id.into(),
            last_height: start_height,
            last_nonce: BTreeMap::new(),
        }
    }

    /// Last nonce accepted from `caller`, if any.
    pub fn last_nonce(&self, caller: &Principal) -> Option<u64> {
        self.last_nonce.get(caller).copied()
    }
}

pub fn principal_of(secret: &[u8; 32]) -> Principal {
    let key = SigningKey::from_bytes(secret);
    Principal::from_bytes(key.verifying_key().to_bytes())
}

pub fn sign_call(chain_id: &str, nonce: u64, call: Call, secret: &[u8; 32]) -> SignedCall {
    let key = SigningKey::from_bytes(secret);
    let caller = Principal::from_bytes(key.verifying_key().to_bytes());
    let sig = key.sign(&SignedCall::signing_digest(chain_id, &caller, nonce, &call));
    SignedCall {
        caller,
        nonce,
        call,
        signature: hex::encode(sig.to_bytes()),
    }
}

fn to_verifying_key(p: &Principal) -> Option<VerifyingKey> {
    VerifyingKey::from_bytes(p.as_bytes()).ok()
}

fn to_signature(sig_hex: &str) -> Option<Signature> {
    let mut bytes = [0u8; 64];
    hex::decode_to_slice(sig_hex, &mut bytes).ok()?;
    Some(Signature::from_bytes(&bytes))
}

/// Stateful validator:
/// - the signature must verify against `signed.caller` for `ctx.chain_id`
/// - `signed.nonce` must be above the caller's last accepted nonce
/// - `block_height` must not be below the last accepted height
/// - updates ctx only on success
pub fn validate_call(
    signed: &SignedCall,
    block_height: BlockHeight,
    ctx: &mut ValidationContext,
) -> Result<CallContext, ValidationError> {
    let digest =
        SignedCall::signing_digest(&ctx.chain_id, &signed.caller, signed.nonce, &signed.call);
    let vk = to_verifying_key(&signed.caller).ok_or(ValidationError::InvalidSignature)?;
    let sig = to_signature(&signed.signature).ok_or(ValidationError::InvalidSignature)?;
    vk.verify(&digest, &sig).map_err(|_| ValidationError::InvalidSignature)?;

    let used = ctx.last_nonce(&signed.caller);
    if used.is_some_and(|last| signed.nonce <= last) {
        return Err(ValidationError::Replayed {
            caller: signed.caller,
            nonce: signed.nonce,
        });
    }
    if block_height < ctx.last_height {
        return Err(ValidationError::ClockRegressed {
            last: ctx.last_height,
            got: block_height,
        });
    }
    ctx.last_height = block_height;
    ctx.last_nonce.insert(signed.caller, signed.nonce);

    Ok(CallContext::new(signed.caller, block_height))
}
