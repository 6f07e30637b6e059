// Authorization guard: one admin principal shared by every registry.

use crate::error::Unauthorized;
use crate::principal::Principal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationGuard {
    admin: Principal,
}

impl AuthorizationGuard {
    pub fn new(admin: Principal) -> Self {
        AuthorizationGuard { admin }
    }

    pub fn admin(&self) -> Principal {
        self.admin
    }

    /// Must run before any other validation in a mutating entry point.
    pub fn authorize(&self, caller: &Principal) -> Result<(), Unauthorized> {
        if *caller == self.admin {
            Ok(())
        } else {
            Err(Unauthorized)
        }
    }

    /// Hand the admin role to `new_admin`. Only the current admin may do this.
    pub fn transfer_admin(
        &mut self,
        caller: &Principal,
        new_admin: Principal,
    ) -> Result<Principal, Unauthorized> {
        self.authorize(caller)?;
        let previous = std::mem::replace(&mut self.admin, new_admin);
        Ok(previous)
    }
}
