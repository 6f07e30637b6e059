// Entity registry: regulated organisations, pending -> verified.

use crate::error::RegistryError;
use crate::ids::EntityId;
use crate::journal::RegistryEvent;
use crate::lifecycle::ReviewStatus;
use crate::principal::{BlockHeight, CallContext};
use crate::registry::Record;
use crate::state::RegistryState;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub industry: String,
    pub registration_date: BlockHeight,
    pub status: ReviewStatus,
}

impl Record for Entity {
    type Status = ReviewStatus;

    fn status(&self) -> ReviewStatus {
        self.status
    }

    fn status_mut(&mut self) -> &mut ReviewStatus {
        &mut self.status
    }
}

impl RegistryState {
    pub fn register_entity(
        &mut self,
        ctx: &CallContext,
        entity_id: EntityId,
        name: impl Into<String>,
        industry: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let (name, industry) = (name.into(), industry.into());
        self.entities
            .create(&self.guard, ctx, entity_id.clone(), |stamp| Entity {
                name,
                industry,
                registration_date: stamp.at,
                status: stamp.status,
            })
            .map_err(|e| Self::rejected("register_entity", ctx, e.into()))?;

        tracing::debug!(%entity_id, height = ctx.block_height, "entity registered");
        self.journal
            .record(ctx, RegistryEvent::EntityRegistered { entity_id });
        Ok(())
    }

    pub fn verify_entity(
        &mut self,
        ctx: &CallContext,
        entity_id: &EntityId,
    ) -> Result<(), RegistryError> {
        self.entities
            .advance_status(&self.guard, ctx, entity_id)
            .map_err(|e| Self::rejected("verify_entity", ctx, e.into()))?;

        tracing::debug!(%entity_id, "entity verified");
        self.journal.record(
            ctx,
            RegistryEvent::EntityVerified {
                entity_id: entity_id.clone(),
            },
        );
        Ok(())
    }

    pub fn get_entity(&self, entity_id: &EntityId) -> Option<&Entity> {
        self.entities.get(entity_id)
    }
}
