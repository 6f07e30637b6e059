// Two-state record lifecycles. One directed edge each, no way back.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Closed status set with a fixed successor function.
/// Terminal states map to themselves, which makes advancing idempotent.
pub trait Lifecycle: Copy + Eq + Debug {
    const INITIAL: Self;

    fn next(self) -> Self;

    fn is_terminal(self) -> bool {
        self.next() == self
    }
}

/// Entities, methodologies and reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Verified,
}

impl Lifecycle for ReviewStatus {
    const INITIAL: Self = ReviewStatus::Pending;

    fn next(self) -> Self {
        match self {
            ReviewStatus::Pending | ReviewStatus::Verified => ReviewStatus::Verified,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateStatus {
    Active,
    Revoked,
}

impl Lifecycle for CertificateStatus {
    const INITIAL: Self = CertificateStatus::Active;

    fn next(self) -> Self {
        match self {
            CertificateStatus::Active | CertificateStatus::Revoked => CertificateStatus::Revoked,
        }
    }
}
