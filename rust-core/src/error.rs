// Failure results. Every one is an expected, caller-visible outcome.

use thiserror::Error;

/// Caller is not the current admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("caller is not the current admin")]
pub struct Unauthorized;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CreateError {
    #[error(transparent)]
    Unauthorized(#[from] Unauthorized),
    #[error("identifier already exists")]
    DuplicateId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdvanceError {
    #[error(transparent)]
    Unauthorized(#[from] Unauthorized),
    #[error("identifier not found")]
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("owner index is at capacity ({capacity} entries)")]
    CapacityExceeded { capacity: usize },
}

/// Crate-wide result of a registry operation, carrying the numeric code
/// surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("caller is not the current admin")]
    Unauthorized,
    #[error("duplicate identifier")]
    DuplicateId,
    #[error("per-owner index at capacity")]
    CapacityExceeded,
    #[error("identifier not found")]
    NotFound,
}

impl RegistryError {
    pub const fn code(self) -> u32 {
        match self {
            RegistryError::Unauthorized => 403,
            RegistryError::DuplicateId => 100,
            RegistryError::CapacityExceeded => 101,
            RegistryError::NotFound => 404,
        }
    }
}

impl From<Unauthorized> for RegistryError {
    fn from(_: Unauthorized) -> Self {
        RegistryError::Unauthorized
    }
}

impl From<CreateError> for RegistryError {
    fn from(e: CreateError) -> Self {
        match e {
            CreateError::Unauthorized(_) => RegistryError::Unauthorized,
            CreateError::DuplicateId => RegistryError::DuplicateId,
        }
    }
}

impl From<AdvanceError> for RegistryError {
    fn from(e: AdvanceError) -> Self {
        match e {
            AdvanceError::Unauthorized(_) => RegistryError::Unauthorized,
            AdvanceError::NotFound => RegistryError::NotFound,
        }
    }
}

impl From<IndexError> for RegistryError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::CapacityExceeded { .. } => RegistryError::CapacityExceeded,
        }
    }
}
