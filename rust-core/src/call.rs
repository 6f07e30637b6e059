// Call envelope: one variant per mutating operation, routed onto RegistryState.

use crate::certificate::CertificateIssue;
use crate::encoding::{put_str, put_u64};
use crate::error::RegistryError;
use crate::ids::{CertificateId, EntityId, MethodologyId, ReportId};
use crate::principal::{CallContext, Principal};
use crate::report::{ReportSubmission, Tonnes};
use crate::state::RegistryState;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Call {
    RegisterEntity {
        entity_id: EntityId,
        name: String,
        industry: String,
    },
    VerifyEntity {
        entity_id: EntityId,
    },
    RegisterMethodology {
        methodology_id: MethodologyId,
        name: String,
        description: String,
        industry: String,
    },
    VerifyMethodology {
        methodology_id: MethodologyId,
    },
    SubmitReport {
        report_id: ReportId,
        entity_id: EntityId,
        methodology_id: MethodologyId,
        emissions_amount: Tonnes,
        period_start: u64,
        period_end: u64,
    },
    VerifyReport {
        report_id: ReportId,
    },
    IssueCertificate {
        certificate_id: CertificateId,
        entity_id: EntityId,
        baseline_report_id: ReportId,
        current_report_id: ReportId,
        reduction_amount: Tonnes,
        validity_period: u64,
    },
    RevokeCertificate {
        certificate_id: CertificateId,
    },
    TransferAdmin {
        new_admin: Principal,
    },
}

impl Call {
    pub fn op_name(&self) -> &'static str {
        match self {
            Call::RegisterEntity { .. } => "register_entity",
            Call::VerifyEntity { .. } => "verify_entity",
            Call::RegisterMethodology { .. } => "register_methodology",
            Call::VerifyMethodology { .. } => "verify_methodology",
            Call::SubmitReport { .. } => "submit_report",
            Call::VerifyReport { .. } => "verify_report",
            Call::IssueCertificate { .. } => "issue_certificate",
            Call::RevokeCertificate { .. } => "revoke_certificate",
            Call::TransferAdmin { .. } => "transfer_admin",
        }
    }

    /// Bytes covered by the caller's signature.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(128);
        match self {
            Call::RegisterEntity {
                entity_id,
                name,
                industry,
            } => {
                out.push(1);
                put_str(&mut out, entity_id.as_str());
                put_str(&mut out, name);
                put_str(&mut out, industry);
            }
            Call::VerifyEntity { entity_id } => {
                out.push(2);
                put_str(&mut out, entity_id.as_str());
            }
            Call::RegisterMethodology {
                methodology_id,
                name,
                description,
                industry,
            } => {
                out.push(3);
                put_str(&mut out, methodology_id.as_str());
                put_str(&mut out, name);
                put_str(&mut out, description);
                put_str(&mut out, industry);
            }
            Call::VerifyMethodology { methodology_id } => {
                out.push(4);
                put_str(&mut out, methodology_id.as_str());
            }
            Call::SubmitReport {
                report_id,
                entity_id,
                methodology_id,
                emissions_amount,
                period_start,
                period_end,
            } => {
                out.push(5);
                put_str(&mut out, report_id.as_str());
                put_str(&mut out, entity_id.as_str());
                put_str(&mut out, methodology_id.as_str());
                put_u64(&mut out, *emissions_amount);
                put_u64(&mut out, *period_start);
                put_u64(&mut out, *period_end);
            }
            Call::VerifyReport { report_id } => {
                out.push(6);
                put_str(&mut out, report_id.as_str());
            }
            Call::IssueCertificate {
                certificate_id,
                entity_id,
                baseline_report_id,
                current_report_id,
                reduction_amount,
                validity_period,
            } => {
                out.push(7);
                put_str(&mut out, certificate_id.as_str());
                put_str(&mut out, entity_id.as_str());
                put_str(&mut out, baseline_report_id.as_str());
                put_str(&mut out, current_report_id.as_str());
                put_u64(&mut out, *reduction_amount);
                put_u64(&mut out, *validity_period);
            }
            Call::RevokeCertificate { certificate_id } => {
                out.push(8);
                put_str(&mut out, certificate_id.as_str());
            }
            Call::TransferAdmin { new_admin } => {
                out.push(9);
                out.extend_from_slice(new_admin.as_bytes());
            }
        }
        out
    }
}

/// Route `call` to its registry operation under `ctx`.
pub fn dispatch(
    state: &mut RegistryState,
    ctx: &CallContext,
    call: Call,
) -> Result<(), RegistryError> {
    match call {
        Call::RegisterEntity {
            entity_id,
            name,
            industry,
        } => state.register_entity(ctx, entity_id, name, industry),
        Call::VerifyEntity { entity_id } => state.verify_entity(ctx, &entity_id),
        Call::RegisterMethodology {
            methodology_id,
            name,
            description,
            industry,
        } => state.register_methodology(ctx, methodology_id, name, description, industry),
        Call::VerifyMethodology { methodology_id } => {
            state.verify_methodology(ctx, &methodology_id)
        }
        Call::SubmitReport {
            report_id,
            entity_id,
            methodology_id,
            emissions_amount,
            period_start,
            period_end,
        } => state.submit_report(
            ctx,
            report_id,
            ReportSubmission {
                entity_id,
                methodology_id,
                emissions_amount,
                period_start,
                period_end,
            },
        ),
        Call::VerifyReport { report_id } => state.verify_report(ctx, &report_id),
        Call::IssueCertificate {
            certificate_id,
            entity_id,
            baseline_report_id,
            current_report_id,
            reduction_amount,
            validity_period,
        } => state.issue_certificate(
            ctx,
            certificate_id,
            CertificateIssue {
                entity_id,
                baseline_report_id,
                current_report_id,
                reduction_amount,
                validity_period,
            },
        ),
        Call::RevokeCertificate { certificate_id } => {
            state.revoke_certificate(ctx, &certificate_id)
        }
        Call::TransferAdmin { new_admin } => state.transfer_admin(ctx, new_admin),
    }
}
