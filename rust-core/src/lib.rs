// Carbon-accounting registry core: deterministic, in-memory, admin-gated.

pub mod call;
pub mod certificate;
mod encoding;
pub mod config;
pub mod entity;
pub mod error;
pub mod guard;
pub mod ids;
pub mod index;
pub mod journal;
pub mod lifecycle;
pub mod methodology;
pub mod principal;
pub mod registry;
pub mod replay;
pub mod report;
pub mod state;
pub mod validation;

pub use error::RegistryError;
pub use principal::{BlockHeight, CallContext, Principal};
pub use state::RegistryState;

// Caller identity and the clock reading are inputs; nothing here reads a wall clock.

/*
Intentionally avoids:
- async
- threads
- global mutable state
- external IO (outside config loading)
*/
