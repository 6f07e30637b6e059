// Report registry: emissions reports, pending -> verified, indexed per entity.

use crate::error::RegistryError;
use crate::ids::{EntityId, MethodologyId, ReportId};
use crate::journal::RegistryEvent;
use crate::lifecycle::ReviewStatus;
use crate::principal::{BlockHeight, CallContext};
use crate::registry::Record;
use crate::state::RegistryState;
use serde::{Deserialize, Serialize};

/// Tonnes of CO2-equivalent.
pub type Tonnes = u64;

/// An emissions report. `entity_id` and `methodology_id` are weak references:
/// they are stored for lookup and never checked against their registries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub entity_id: EntityId,
    pub methodology_id: MethodologyId,
    pub emissions_amount: Tonnes,
    pub period_start: BlockHeight,
    pub period_end: BlockHeight,
    pub submission_date: BlockHeight,
    pub status: ReviewStatus,
}

impl Record for Report {
    type Status = ReviewStatus;

    fn status(&self) -> ReviewStatus {
        self.status
    }

    fn status_mut(&mut self) -> &mut ReviewStatus {
        &mut self.status
    }
}

/// Fields supplied by the submitter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSubmission {
    pub entity_id: EntityId,
    pub methodology_id: MethodologyId,
    pub emissions_amount: Tonnes,
    pub period_start: BlockHeight,
    pub period_end: BlockHeight,
}

impl RegistryState {
    /// Store the report and append it to its entity's index, or do neither.
    /// Checks run in order: admin, duplicate id, index capacity.
    pub fn submit_report(
        &mut self,
        ctx: &CallContext,
        report_id: ReportId,
        submission: ReportSubmission,
    ) -> Result<(), RegistryError> {
        let slot = self
            .reports
            .reserve(&self.guard, ctx, report_id.clone())
            .map_err(|e| Self::rejected("submit_report", ctx, e.into()))?;
        self.entity_reports
            .ensure_room(&submission.entity_id)
            .map_err(|e| Self::rejected("submit_report", ctx, e.into()))?;

        let entity_id = submission.entity_id.clone();
        slot.insert(|stamp| Report {
            entity_id: submission.entity_id,
            methodology_id: submission.methodology_id,
            emissions_amount: submission.emissions_amount,
            period_start: submission.period_start,
            period_end: submission.period_end,
            submission_date: stamp.at,
            status: stamp.status,
        });
        self.entity_reports
            .append(entity_id.clone(), report_id.clone())?;

        tracing::debug!(%report_id, %entity_id, height = ctx.block_height, "report submitted");
        self.journal.record(
            ctx,
            RegistryEvent::ReportSubmitted {
                report_id,
                entity_id,
            },
        );
        Ok(())
    }

    pub fn verify_report(
        &mut self,
        ctx: &CallContext,
        report_id: &ReportId,
    ) -> Result<(), RegistryError> {
        self.reports
            .advance_status(&self.guard, ctx, report_id)
            .map_err(|e| Self::rejected("verify_report", ctx, e.into()))?;

        tracing::debug!(%report_id, "report verified");
        self.journal.record(
            ctx,
            RegistryEvent::ReportVerified {
                report_id: report_id.clone(),
            },
        );
        Ok(())
    }

    pub fn get_report(&self, report_id: &ReportId) -> Option<&Report> {
        self.reports.get(report_id)
    }

    /// Report ids of an entity in submission order.
    pub fn entity_reports(&self, entity_id: &EntityId) -> Option<&[ReportId]> {
        self.entity_reports.lookup(entity_id)
    }
}
