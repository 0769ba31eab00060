use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use counterate_domain::command::Command;
use counterate_domain::identity::Role;

use crate::domain::repository::{IdentityRepository, UnitConfigRepository};
use crate::domain::types::Identity;
use crate::error::SignageServiceError;
use crate::usecase::pairing::ResolveUnitAdminUseCase;

// ── SetCommand ───────────────────────────────────────────────────────────────

pub struct SetCommandUseCase<I: IdentityRepository, C: UnitConfigRepository> {
    pub identities: I,
    pub configs: C,
    pub marquee_text: String,
}

impl<I: IdentityRepository, C: UnitConfigRepository> SetCommandUseCase<I, C> {
    /// Overwrite the unit's mailbox. An admin may only address its own unit.
    pub async fn execute(
        &self,
        actor: &Identity,
        unit_admin_id: Uuid,
        command: Command,
    ) -> Result<(), SignageServiceError> {
        match actor.role {
            Role::SuperAdmin => {}
            Role::Admin if actor.id == unit_admin_id => {}
            _ => return Err(SignageServiceError::Forbidden),
        }

        let admin = self
            .identities
            .find_by_id(unit_admin_id)
            .await?
            .filter(|i| i.role.is_admin_like())
            .ok_or(SignageServiceError::UnitNotFound)?;

        self.configs
            .get_or_create(admin.id, &self.marquee_text)
            .await?;
        self.configs
            .set_command(admin.id, command, Utc::now())
            .await?;

        info!(admin_id = %admin.id, actor_id = %actor.id, %command, "command queued");
        Ok(())
    }
}

// ── DrainCommand ─────────────────────────────────────────────────────────────

pub struct DrainCommandUseCase<I: IdentityRepository, C: UnitConfigRepository> {
    pub resolver: ResolveUnitAdminUseCase<I>,
    pub configs: C,
}

impl<I: IdentityRepository, C: UnitConfigRepository> DrainCommandUseCase<I, C> {
    /// Take the pending command for the caller's unit, leaving the slot empty.
    pub async fn execute(&self, identity_id: Uuid) -> Result<Option<Command>, SignageServiceError> {
        let Some(admin) = self.resolver.execute(identity_id).await? else {
            return Ok(None);
        };
        let Some(raw) = self.configs.take_command(admin.id).await? else {
            return Ok(None);
        };

        match raw.parse::<Command>() {
            Ok(command) => {
                info!(admin_id = %admin.id, identity_id = %identity_id, %command, "command drained");
                Ok(Some(command))
            }
            Err(e) => {
                warn!(error = %e, admin_id = %admin.id, "dropping unknown pending command");
                Ok(None)
            }
        }
    }
}
