use tracing::info;

use counterate_domain::identity::Role;

use crate::domain::repository::IdentityRepository;
use crate::domain::types::{Identity, IdentityPatch, UnitDefaults, is_valid_username};
use crate::error::SignageServiceError;

// ── CreateSuperAdmin ─────────────────────────────────────────────────────────

pub struct CreateSuperAdminUseCase<I: IdentityRepository> {
    pub repo: I,
    pub defaults: UnitDefaults,
}

impl<I: IdentityRepository> CreateSuperAdminUseCase<I> {
    /// Add another super-admin. Without a credential it gets the admin default.
    pub async fn execute(
        &self,
        actor: &Identity,
        username: &str,
        credential_hash: Option<String>,
    ) -> Result<Identity, SignageServiceError> {
        let username = username.trim();
        if !is_valid_username(username) {
            return Err(SignageServiceError::InvalidUsername);
        }

        let mut identity = Identity::new(
            username.to_owned(),
            credential_hash
                .unwrap_or_else(|| self.defaults.credential_for(Role::SuperAdmin).to_owned()),
            Role::SuperAdmin,
        );
        identity.created_by = Some(actor.username.clone());
        self.repo.create_identity(&identity).await?;

        info!(identity_id = %identity.id, actor_id = %actor.id, "super-admin created");
        Ok(identity)
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct ProfileInput {
    pub username: Option<String>,
    pub credential_hash: Option<String>,
}

pub struct UpdateProfileUseCase<I: IdentityRepository> {
    pub repo: I,
}

impl<I: IdentityRepository> UpdateProfileUseCase<I> {
    /// Change the caller's own username or credential. Returns whether
    /// anything was written. A new credential ends the current session.
    pub async fn execute(
        &self,
        actor: &Identity,
        input: ProfileInput,
    ) -> Result<bool, SignageServiceError> {
        let mut patch = IdentityPatch::new(actor.id);
        if let Some(name) = input.username.as_deref().map(str::trim) {
            if !is_valid_username(name) {
                return Err(SignageServiceError::InvalidUsername);
            }
            if name != actor.username {
                patch.username = Some(name.to_owned());
            }
        }
        patch.credential_hash = input.credential_hash.filter(|h| !h.is_empty());

        if patch.is_empty() {
            return Ok(false);
        }
        self.repo.apply_patches(&[patch]).await?;

        info!(identity_id = %actor.id, "profile updated");
        Ok(true)
    }
}
