use tracing::info;
use uuid::Uuid;

use counterate_domain::change::ChangeKind;
use counterate_domain::identity::{Role, Status};

use crate::domain::repository::{ChangePublisher, IdentityRepository, UnitConfigRepository};
use crate::domain::types::{
    BrandingPatch, Identity, IdentityPatch, NewUnit, PairingView, UnitConfig, UnitDefaults,
    UnitSummary, default_display_username, is_valid_username,
};
use crate::error::SignageServiceError;

/// The admin side of a unit and its display, if paired.
async fn load_unit<I: IdentityRepository>(
    repo: &I,
    admin_id: Uuid,
) -> Result<(Identity, Option<Identity>), SignageServiceError> {
    let view = repo
        .find_pairing(admin_id)
        .await?
        .filter(|v| v.identity.role == Role::Admin)
        .ok_or(SignageServiceError::UnitNotFound)?;
    let display = paired_display(&view);
    Ok((view.identity, display))
}

fn paired_display(view: &PairingView) -> Option<Identity> {
    view.counterpart()
        .filter(|c| c.role == Role::Display)
        .cloned()
}

fn checked_username(username: &str) -> Result<String, SignageServiceError> {
    let username = username.trim();
    if !is_valid_username(username) {
        return Err(SignageServiceError::InvalidUsername);
    }
    Ok(username.to_owned())
}

// ── CreateUnit ───────────────────────────────────────────────────────────────

pub struct CreateUnitInput {
    pub username: String,
    pub display_username: Option<String>,
    pub admin_credential_hash: Option<String>,
    pub display_credential_hash: Option<String>,
    pub marquee_text: Option<String>,
}

pub struct CreateUnitUseCase<I: IdentityRepository> {
    pub repo: I,
    pub defaults: UnitDefaults,
}

impl<I: IdentityRepository> CreateUnitUseCase<I> {
    /// Create admin, display and config together. The admin holds the pointer.
    pub async fn execute(
        &self,
        actor: &Identity,
        input: CreateUnitInput,
    ) -> Result<UnitSummary, SignageServiceError> {
        let username = checked_username(&input.username)?;
        let display_username = match input.display_username.as_deref() {
            Some(name) if !name.trim().is_empty() => checked_username(name)?,
            _ => default_display_username(&username),
        };
        if !is_valid_username(&display_username) {
            return Err(SignageServiceError::InvalidUsername);
        }
        if display_username == username {
            return Err(SignageServiceError::UsernameTaken);
        }

        let mut display = Identity::new(
            display_username,
            input
                .display_credential_hash
                .unwrap_or_else(|| self.defaults.display_credential_hash.clone()),
            Role::Display,
        );
        display.created_by = Some(actor.username.clone());

        let mut admin = Identity::new(
            username,
            input
                .admin_credential_hash
                .unwrap_or_else(|| self.defaults.admin_credential_hash.clone()),
            Role::Admin,
        );
        admin.paired_user_id = Some(display.id);
        admin.created_by = Some(actor.username.clone());

        let marquee = input
            .marquee_text
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.defaults.marquee_text.clone());
        let config = UnitConfig::new(admin.id, marquee.clone());

        let unit = NewUnit {
            admin,
            display,
            config,
        };
        self.repo.create_unit(&unit).await?;

        info!(admin_id = %unit.admin.id, display_id = %unit.display.id, actor_id = %actor.id, "unit created");
        Ok(UnitSummary {
            admin: unit.admin,
            display: Some(unit.display),
            marquee_text: Some(marquee),
        })
    }
}

// ── ListUnits ────────────────────────────────────────────────────────────────

pub struct ListUnitsUseCase<I: IdentityRepository> {
    pub repo: I,
}

impl<I: IdentityRepository> ListUnitsUseCase<I> {
    pub async fn execute(&self) -> Result<Vec<UnitSummary>, SignageServiceError> {
        self.repo.list_units().await
    }
}

// ── GetUnitDisplay ───────────────────────────────────────────────────────────

pub struct GetUnitDisplayUseCase<I: IdentityRepository> {
    pub repo: I,
}

impl<I: IdentityRepository> GetUnitDisplayUseCase<I> {
    pub async fn execute(&self, admin_id: Uuid) -> Result<Option<Identity>, SignageServiceError> {
        let (_, display) = load_unit(&self.repo, admin_id).await?;
        Ok(display)
    }
}

// ── UpdateUnit ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateUnitInput {
    pub username: Option<String>,
    pub display_username: Option<String>,
    pub admin_credential_hash: Option<String>,
    pub display_credential_hash: Option<String>,
    pub status: Option<Status>,
    pub marquee_text: Option<String>,
}

pub struct UpdateUnitUseCase<I: IdentityRepository, C: UnitConfigRepository, P: ChangePublisher> {
    pub identities: I,
    pub configs: C,
    pub notifier: P,
    pub marquee_text: String,
}

impl<I, C, P> UpdateUnitUseCase<I, C, P>
where
    I: IdentityRepository,
    C: UnitConfigRepository,
    P: ChangePublisher,
{
    pub async fn execute(
        &self,
        admin_id: Uuid,
        input: UpdateUnitInput,
    ) -> Result<(), SignageServiceError> {
        let (admin, display) = load_unit(&self.identities, admin_id).await?;
        let username = input.username.as_deref().map(checked_username).transpose()?;
        let display_username = input
            .display_username
            .as_deref()
            .map(checked_username)
            .transpose()?;
        if username.is_some() && username == display_username {
            return Err(SignageServiceError::UsernameTaken);
        }

        let mut admin_patch = IdentityPatch::new(admin.id);
        admin_patch.username = username.filter(|n| *n != admin.username);
        admin_patch.credential_hash = input.admin_credential_hash;
        admin_patch.status = input.status;
        let mut patches = vec![admin_patch];
        // Display fields are ignored for an unpaired admin.
        if let Some(display) = &display {
            let mut display_patch = IdentityPatch::new(display.id);
            display_patch.username = display_username.filter(|n| *n != display.username);
            display_patch.credential_hash = input.display_credential_hash;
            display_patch.status = input.status;
            patches.push(display_patch);
        }
        self.identities.apply_patches(&patches).await?;

        if let Some(text) = input.marquee_text {
            self.configs.get_or_create(admin.id, &self.marquee_text).await?;
            let patch = BrandingPatch {
                marquee_text: Some(text),
                ..Default::default()
            };
            self.configs.update_branding(admin.id, &patch).await?;
            self.notifier.publish(ChangeKind::Branding);
        }

        info!(admin_id = %admin.id, "unit updated");
        Ok(())
    }
}

// ── SetStatus ────────────────────────────────────────────────────────────────

pub struct SetStatusUseCase<I: IdentityRepository> {
    pub repo: I,
}

impl<I: IdentityRepository> SetStatusUseCase<I> {
    /// Apply `status` to the identity and whichever counterpart it has.
    pub async fn execute(&self, identity_id: Uuid, status: Status) -> Result<(), SignageServiceError> {
        let view = self
            .repo
            .find_pairing(identity_id)
            .await?
            .ok_or(SignageServiceError::IdentityNotFound)?;
        if view.identity.role == Role::SuperAdmin {
            return Err(SignageServiceError::Forbidden);
        }

        let ids: Vec<Uuid> = std::iter::once(view.identity.id)
            .chain(view.points_to.as_ref().map(|i| i.id))
            .chain(view.pointed_from.as_ref().map(|i| i.id))
            .collect();
        self.repo.set_status(&ids, status).await?;

        info!(identity_id = %identity_id, %status, affected = ids.len(), "status updated");
        Ok(())
    }
}

// ── DeleteUnit ───────────────────────────────────────────────────────────────

pub struct DeleteUnitUseCase<I: IdentityRepository> {
    pub repo: I,
}

impl<I: IdentityRepository> DeleteUnitUseCase<I> {
    pub async fn execute(&self, admin_id: Uuid) -> Result<(), SignageServiceError> {
        let (admin, display) = load_unit(&self.repo, admin_id).await?;
        self.repo
            .delete_unit(admin.id, display.as_ref().map(|d| d.id))
            .await?;
        info!(admin_id = %admin.id, "unit deleted");
        Ok(())
    }
}

// ── ResetCredential ──────────────────────────────────────────────────────────

pub struct ResetCredentialUseCase<I: IdentityRepository> {
    pub repo: I,
    pub defaults: UnitDefaults,
}

impl<I: IdentityRepository> ResetCredentialUseCase<I> {
    /// Reset to `credential_hash`, or the role's default. Resetting a unit
    /// admin resets its display too. Stale sessions fail their next check.
    pub async fn execute(
        &self,
        identity_id: Uuid,
        credential_hash: Option<String>,
    ) -> Result<(), SignageServiceError> {
        let view = self
            .repo
            .find_pairing(identity_id)
            .await?
            .ok_or(SignageServiceError::IdentityNotFound)?;
        let target = &view.identity;
        if target.role == Role::SuperAdmin {
            return Err(SignageServiceError::Forbidden);
        }

        let primary = credential_hash
            .clone()
            .unwrap_or_else(|| self.defaults.credential_for(target.role).to_owned());
        self.repo.replace_credential(target.id, &primary).await?;

        if target.role == Role::Admin {
            if let Some(display) = paired_display(&view) {
                let hash = credential_hash
                    .unwrap_or_else(|| self.defaults.display_credential_hash.clone());
                self.repo.replace_credential(display.id, &hash).await?;
            }
        }

        info!(identity_id = %identity_id, "credential reset");
        Ok(())
    }
}
