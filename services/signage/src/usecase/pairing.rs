use tracing::{info, warn};
use uuid::Uuid;

use counterate_domain::identity::Role;

use crate::domain::repository::IdentityRepository;
use crate::domain::types::{Identity, PairingView, RepairPolicy, UnitDefaults};
use crate::error::SignageServiceError;

/// `created_by` stamp on identities fabricated by repair.
pub const REPAIR_ACTOR: &str = "pairing-repair";

/// The unit admin visible from an already-loaded pairing view, if any.
///
/// An admin is its own unit. Any other identity belongs to whichever
/// counterpart, pointed-to or pointing-from, carries an admin-like role.
pub fn unit_admin(view: &PairingView) -> Option<Identity> {
    if view.identity.role == Role::Admin {
        return Some(view.identity.clone());
    }
    [&view.points_to, &view.pointed_from]
        .into_iter()
        .flatten()
        .find(|c| c.role.is_admin_like())
        .cloned()
}

// ── ResolveUnitAdmin ─────────────────────────────────────────────────────────

pub struct ResolveUnitAdminUseCase<I: IdentityRepository> {
    pub repo: I,
    pub policy: RepairPolicy,
    pub defaults: UnitDefaults,
}

impl<I: IdentityRepository> ResolveUnitAdminUseCase<I> {
    /// Resolve the unit admin for `identity_id`, repairing an orphaned display
    /// once when the policy allows it. Repair failures degrade to `None`.
    pub async fn execute(&self, identity_id: Uuid) -> Result<Option<Identity>, SignageServiceError> {
        let Some(view) = self.repo.find_pairing(identity_id).await? else {
            return Ok(None);
        };
        if let Some(admin) = unit_admin(&view) {
            return Ok(Some(admin));
        }
        if view.identity.role != Role::Display || self.policy == RepairPolicy::Off {
            return Ok(None);
        }

        match repair_orphan(&self.repo, &view.identity, self.policy, &self.defaults).await {
            Ok(RepairOutcome::NoCandidate) => return Ok(None),
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, identity_id = %identity_id, "pairing repair failed");
                return Ok(None);
            }
        }

        // Whoever won the race, the pointer now decides.
        let view = self.repo.find_pairing(identity_id).await?;
        Ok(view.as_ref().and_then(unit_admin))
    }
}

// ── RepairPairing ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// An existing unpaired admin now points at the display.
    Adopted(Uuid),
    /// A locked admin was fabricated for the display.
    Created(Uuid),
    /// Another writer paired the display first.
    Contended,
    /// Policy or data left nothing to pair with.
    NoCandidate,
}

pub struct RepairPairingUseCase<I: IdentityRepository> {
    pub repo: I,
    pub policy: RepairPolicy,
    pub defaults: UnitDefaults,
}

impl<I: IdentityRepository> RepairPairingUseCase<I> {
    pub async fn execute(&self, display_id: Uuid) -> Result<RepairOutcome, SignageServiceError> {
        let view = self
            .repo
            .find_pairing(display_id)
            .await?
            .ok_or(SignageServiceError::IdentityNotFound)?;
        if view.identity.role != Role::Display || unit_admin(&view).is_some() {
            return Ok(RepairOutcome::NoCandidate);
        }
        repair_orphan(&self.repo, &view.identity, self.policy, &self.defaults).await
    }
}

async fn repair_orphan<I: IdentityRepository>(
    repo: &I,
    orphan: &Identity,
    policy: RepairPolicy,
    defaults: &UnitDefaults,
) -> Result<RepairOutcome, SignageServiceError> {
    let mut contended = false;

    if policy.may_adopt() {
        if let Some(admin) = repo.find_adoptable_admin().await? {
            match repo.adopt_pairing(admin.id, orphan.id).await {
                Ok(()) => {
                    info!(display_id = %orphan.id, admin_id = %admin.id, "orphaned display adopted by admin");
                    return Ok(RepairOutcome::Adopted(admin.id));
                }
                // The candidate was taken; creating may still succeed.
                Err(SignageServiceError::PairingConflict) => contended = true,
                Err(e) => return Err(e),
            }
        }
    }

    if policy.may_create() {
        let mut admin = Identity::new(
            fabricated_username(orphan),
            defaults.admin_credential_hash.clone(),
            Role::Admin,
        );
        admin.paired_user_id = Some(orphan.id);
        admin.created_by = Some(REPAIR_ACTOR.to_owned());

        return match repo.insert_counterpart(&admin).await {
            Ok(()) => {
                info!(display_id = %orphan.id, admin_id = %admin.id, "admin fabricated for orphaned display");
                Ok(RepairOutcome::Created(admin.id))
            }
            // The username derives from the display id, so a clash on either
            // unique column means a concurrent repair got there first.
            Err(SignageServiceError::PairingConflict | SignageServiceError::UsernameTaken) => {
                Ok(RepairOutcome::Contended)
            }
            Err(e) => Err(e),
        };
    }

    Ok(if contended {
        RepairOutcome::Contended
    } else {
        RepairOutcome::NoCandidate
    })
}

/// `admin_` plus the random tail of the display id.
fn fabricated_username(orphan: &Identity) -> String {
    let simple = orphan.id.simple().to_string();
    format!("admin_{}", &simple[simple.len() - 12..])
}
