// Certificate registry: reduction certificates, active -> revoked, with
// expiry derived from the logical clock. Indexed per entity.

use crate::error::RegistryError;
use crate::ids::{CertificateId, EntityId, ReportId};
use crate::journal::RegistryEvent;
use crate::lifecycle::CertificateStatus;
use crate::principal::{BlockHeight, CallContext};
use crate::registry::Record;
use crate::report::Tonnes;
use crate::state::RegistryState;
use serde::{Deserialize, Serialize};

/// A reduction certificate. Entity and report ids are weak references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub entity_id: EntityId,
    pub baseline_report_id: ReportId,
    pub current_report_id: ReportId,
    pub reduction_amount: Tonnes,
    pub issuance_date: BlockHeight,
    pub expiration_date: BlockHeight,
    pub status: CertificateStatus,
}

impl Certificate {
    /// Active and not past its expiration height (inclusive).
    pub fn is_valid_at(&self, now: BlockHeight) -> bool {
        self.status == CertificateStatus::Active && now <= self.expiration_date
    }
}

impl Record for Certificate {
    type Status = CertificateStatus;

    fn status(&self) -> CertificateStatus {
        self.status
    }

    fn status_mut(&mut self) -> &mut CertificateStatus {
        &mut self.status
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateIssue {
    pub entity_id: EntityId,
    pub baseline_report_id: ReportId,
    pub current_report_id: ReportId,
    pub reduction_amount: Tonnes,
    /// Blocks from issuance until expiry.
    pub validity_period: BlockHeight,
}

impl RegistryState {
    /// Store the certificate and append it to its entity's index, or do neither.
    pub fn issue_certificate(
        &mut self,
        ctx: &CallContext,
        certificate_id: CertificateId,
        issue: CertificateIssue,
    ) -> Result<(), RegistryError> {
        let slot = self
            .certificates
            .reserve(&self.guard, ctx, certificate_id.clone())
            .map_err(|e| Self::rejected("issue_certificate", ctx, e.into()))?;
        self.entity_certificates
            .ensure_room(&issue.entity_id)
            .map_err(|e| Self::rejected("issue_certificate", ctx, e.into()))?;

        let entity_id = issue.entity_id.clone();
        let cert = slot.insert(|stamp| Certificate {
            entity_id: issue.entity_id,
            baseline_report_id: issue.baseline_report_id,
            current_report_id: issue.current_report_id,
            reduction_amount: issue.reduction_amount,
            issuance_date: stamp.at,
            expiration_date: stamp.at.saturating_add(issue.validity_period),
            status: stamp.status,
        });
        let expiration_date = cert.expiration_date;
        self.entity_certificates
            .append(entity_id.clone(), certificate_id.clone())?;

        tracing::debug!(
            %certificate_id,
            %entity_id,
            height = ctx.block_height,
            expiration_date,
            "certificate issued"
        );
        self.journal.record(
            ctx,
            RegistryEvent::CertificateIssued {
                certificate_id,
                entity_id,
                expiration_date,
            },
        );
        Ok(())
    }

    pub fn revoke_certificate(
        &mut self,
        ctx: &CallContext,
        certificate_id: &CertificateId,
    ) -> Result<(), RegistryError> {
        self.certificates
            .advance_status(&self.guard, ctx, certificate_id)
            .map_err(|e| Self::rejected("revoke_certificate", ctx, e.into()))?;

        tracing::debug!(%certificate_id, "certificate revoked");
        self.journal.record(
            ctx,
            RegistryEvent::CertificateRevoked {
                certificate_id: certificate_id.clone(),
            },
        );
        Ok(())
    }

    pub fn get_certificate(&self, certificate_id: &CertificateId) -> Option<&Certificate> {
        self.certificates.get(certificate_id)
    }

    pub fn entity_certificates(&self, entity_id: &EntityId) -> Option<&[CertificateId]> {
        self.entity_certificates.lookup(entity_id)
    }

    /// Evaluated against `now` on every call; unknown ids are simply invalid.
    pub fn is_certificate_valid(&self, certificate_id: &CertificateId, now: BlockHeight) -> bool {
        self.certificates
            .get(certificate_id)
            .is_some_and(|c| c.is_valid_at(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principal::Principal;

    const ADMIN: Principal = Principal::from_bytes([0xA1; 32]);

    fn issue(entity: &str, amount: Tonnes, validity: BlockHeight) -> CertificateIssue {
        CertificateIssue {
            entity_id: entity.into(),
            baseline_report_id: "report1".into(),
            current_report_id: "report2".into(),
            reduction_amount: amount,
            validity_period: validity,
        }
    }

    #[test]
    fn issue_sets_expiry_and_index() {
        let mut state = RegistryState::new(ADMIN);
        let ctx = CallContext::new(ADMIN, 100);
        state.issue_certificate(&ctx, "cert1".into(), issue("entity1", 50, 365)).unwrap();

        assert_eq!(
            state.get_certificate(&"cert1".into()),
            Some(&Certificate {
                entity_id: "entity1".into(),
                baseline_report_id: "report1".into(),
                current_report_id: "report2".into(),
                reduction_amount: 50,
                issuance_date: 100,
                expiration_date: 465,
                status: CertificateStatus::Active,
            })
        );
        assert_eq!(
            state.entity_certificates(&"entity1".into()),
            Some(&[CertificateId::from("cert1")][..])
        );
    }

    #[test]
    fn validity_window_is_inclusive() {
        let mut state = RegistryState::new(ADMIN);
        let id = CertificateId::from("cert1");
        state
            .issue_certificate(&CallContext::new(ADMIN, 100), id.clone(), issue("entity1", 50, 365))
            .unwrap();
        assert!(state.is_certificate_valid(&id, 100));
        assert!(state.is_certificate_valid(&id, 465));
        assert!(!state.is_certificate_valid(&id, 466));
        assert!(!state.is_certificate_valid(&"nonexistent".into(), 100));
    }

    #[test]
    fn revoked_is_invalid_inside_window() {
        let mut state = RegistryState::new(ADMIN);
        let ctx = CallContext::new(ADMIN, 100);
        let id = CertificateId::from("cert1");
        state.issue_certificate(&ctx, id.clone(), issue("entity1", 50, 365)).unwrap();
        state.revoke_certificate(&ctx, &id).unwrap();
        assert_eq!(state.get_certificate(&id).unwrap().status, CertificateStatus::Revoked);
        assert!(!state.is_certificate_valid(&id, 200));
        state.revoke_certificate(&ctx, &id).unwrap();
        assert_eq!(
            state.revoke_certificate(&ctx, &"nonexistent".into()),
            Err(RegistryError::NotFound)
        );
    }

    #[test]
    fn expiry_saturates() {
        let mut state = RegistryState::new(ADMIN);
        let id = CertificateId::from("forever");
        let ctx = CallContext::new(ADMIN, 10);
        state.issue_certificate(&ctx, id.clone(), issue("entity1", 1, u64::MAX)).unwrap();
        assert_eq!(state.get_certificate(&id).unwrap().expiration_date, u64::MAX);
        assert!(state.is_certificate_valid(&id, u64::MAX));
    }

    #[test]
    fn duplicate_issue_keeps_first() {
        let mut state = RegistryState::new(ADMIN);
        let ctx = CallContext::new(ADMIN, 100);
        state.issue_certificate(&ctx, "cert1".into(), issue("entity1", 50, 365)).unwrap();
        assert_eq!(
            state.issue_certificate(&ctx, "cert1".into(), issue("entity1", 60, 365)),
            Err(RegistryError::DuplicateId)
        );
        assert_eq!(state.get_certificate(&"cert1".into()).unwrap().reduction_amount, 50);
        assert_eq!(state.entity_certificates(&"entity1".into()).unwrap().len(), 1);
    }
}
