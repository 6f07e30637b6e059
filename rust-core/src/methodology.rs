// Methodology registry: approved measurement methods, pending -> verified.

use crate::error::RegistryError;
use crate::ids::MethodologyId;
use crate::journal::RegistryEvent;
use crate::lifecycle::ReviewStatus;
use crate::principal::{BlockHeight, CallContext};
use crate::registry::Record;
use crate::state::RegistryState;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Methodology {
    pub name: String,
    pub description: String,
    pub industry: String,
    pub creation_date: BlockHeight,
    pub status: ReviewStatus,
}

impl Record for Methodology {
    type Status = ReviewStatus;

    fn status(&self) -> ReviewStatus {
        self.status
    }

    fn status_mut(&mut self) -> &mut ReviewStatus {
        &mut self.status
    }
}

impl RegistryState {
    pub fn register_methodology(
        &mut self,
        ctx: &CallContext,
        methodology_id: MethodologyId,
        name: impl Into<String>,
        description: impl Into<String>,
        industry: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let (name, description, industry) = (name.into(), description.into(), industry.into());
        self.methodologies
            .create(&self.guard, ctx, methodology_id.clone(), |stamp| Methodology {
                name,
                description,
                industry,
                creation_date: stamp.at,
                status: stamp.status,
            })
            .map_err(|e| Self::rejected("register_methodology", ctx, e.into()))?;

        tracing::debug!(%methodology_id, height = ctx.block_height, "methodology registered");
        self.journal
            .record(ctx, RegistryEvent::MethodologyRegistered { methodology_id });
        Ok(())
    }

    pub fn verify_methodology(
        &mut self,
        ctx: &CallContext,
        methodology_id: &MethodologyId,
    ) -> Result<(), RegistryError> {
        self.methodologies
            .advance_status(&self.guard, ctx, methodology_id)
            .map_err(|e| Self::rejected("verify_methodology", ctx, e.into()))?;

        tracing::debug!(%methodology_id, "methodology verified");
        self.journal.record(
            ctx,
            RegistryEvent::MethodologyVerified {
                methodology_id: methodology_id.clone(),
            },
        );
        Ok(())
    }

    pub fn get_methodology(&self, methodology_id: &MethodologyId) -> Option<&Methodology> {
        self.methodologies.get(methodology_id)
    }
}
