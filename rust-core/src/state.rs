// Registry state: the one value every operation reads and mutates.
// Created once from genesis, changed only through the registry operations.

use crate::certificate::Certificate;
use crate::entity::Entity;
use crate::error::RegistryError;
use crate::guard::AuthorizationGuard;
use crate::ids::{CertificateId, EntityId, MethodologyId, ReportId};
use crate::index::IndexList;
use crate::journal::{Journal, RegistryEvent};
use crate::methodology::Methodology;
use crate::principal::{CallContext, Principal};
use crate::registry::KeyedRegistry;
use crate::report::Report;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegistryState {
    pub(crate) guard: AuthorizationGuard,
    pub(crate) entities: KeyedRegistry<EntityId, Entity>,
    pub(crate) methodologies: KeyedRegistry<MethodologyId, Methodology>,
    pub(crate) reports: KeyedRegistry<ReportId, Report>,
    pub(crate) entity_reports: IndexList<EntityId, ReportId>,
    pub(crate) certificates: KeyedRegistry<CertificateId, Certificate>,
    pub(crate) entity_certificates: IndexList<EntityId, CertificateId>,
    pub(crate) journal: Journal,
}

impl RegistryState {
    pub fn new(admin: Principal) -> Self {
        RegistryState {
            guard: AuthorizationGuard::new(admin),
            entities: KeyedRegistry::new(),
            methodologies: KeyedRegistry::new(),
            reports: KeyedRegistry::new(),
            entity_reports: IndexList::new(),
            certificates: KeyedRegistry::new(),
            entity_certificates: IndexList::new(),
            journal: Journal::new(),
        }
    }

    pub fn admin(&self) -> Principal {
        self.guard.admin()
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Reassign the admin role. The new principal is immediately authorized
    /// across all four registries.
    pub fn transfer_admin(
        &mut self,
        ctx: &CallContext,
        new_admin: Principal,
    ) -> Result<(), RegistryError> {
        let previous = self
            .guard
            .transfer_admin(&ctx.caller, new_admin)
            .map_err(|e| Self::rejected("transfer_admin", ctx, e.into()))?;
        tracing::info!(%previous, %new_admin, height = ctx.block_height, "admin transferred");
        self.journal.record(
            ctx,
            RegistryEvent::AdminTransferred {
                previous,
                new_admin,
            },
        );
        Ok(())
    }

    pub(crate) fn rejected(
        op: &'static str,
        ctx: &CallContext,
        err: RegistryError,
    ) -> RegistryError {
        tracing::debug!(
            op,
            caller = %ctx.caller,
            height = ctx.block_height,
            code = err.code(),
            "call rejected: {err}"
        );
        err
    }
}
