#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use counterate_domain::change::ChangeKind;
use counterate_domain::command::Command;
use counterate_domain::identity::Status;

use crate::domain::types::{
    ActivityEntry, ActivityRecord, BrandingPatch, DepositRate, ForexRate, Identity,
    IdentityPatch, NewUnit, PairingView, UnitConfig, UnitSummary, VideoDisplay,
};
use crate::error::SignageServiceError;

/// Repository for identities and the pairing pointer between them.
pub trait IdentityRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, SignageServiceError>;

    /// Load an identity with the counterpart it points to and the one pointing to it.
    async fn find_pairing(&self, id: Uuid) -> Result<Option<PairingView>, SignageServiceError>;

    /// Oldest `ADMIN` that neither holds nor is the target of a pairing pointer.
    async fn find_adoptable_admin(&self) -> Result<Option<Identity>, SignageServiceError>;

    /// Point `admin_id` at `display_id` only if the admin is still unpaired.
    ///
    /// Fails with `PairingConflict` when another writer paired either side first.
    async fn adopt_pairing(
        &self,
        admin_id: Uuid,
        display_id: Uuid,
    ) -> Result<(), SignageServiceError>;

    /// Insert a fabricated counterpart whose `paired_user_id` is already set.
    ///
    /// Fails with `PairingConflict` when the target already has a counterpart.
    async fn insert_counterpart(&self, identity: &Identity) -> Result<(), SignageServiceError>;

    /// Insert an identity with no counterpart.
    ///
    /// Fails with `UsernameTaken` when the username is in use.
    async fn create_identity(&self, identity: &Identity) -> Result<(), SignageServiceError>;

    /// Create admin, display and config in one transaction.
    async fn create_unit(&self, unit: &NewUnit) -> Result<(), SignageServiceError>;

    /// Every `ADMIN` ordered by username, with its counterpart and marquee.
    async fn list_units(&self) -> Result<Vec<UnitSummary>, SignageServiceError>;

    /// Apply every patch in one transaction; nothing is kept if any fails.
    ///
    /// A credential change bumps `session_version`. Fails with `UsernameTaken`
    /// on a username clash and `IdentityNotFound` when a patched row is gone.
    async fn apply_patches(&self, patches: &[IdentityPatch]) -> Result<(), SignageServiceError>;

    async fn set_status(&self, ids: &[Uuid], status: Status) -> Result<(), SignageServiceError>;

    /// Replace the credential hash and bump `session_version`.
    async fn replace_credential(
        &self,
        id: Uuid,
        credential_hash: &str,
    ) -> Result<(), SignageServiceError>;

    /// Remove the admin, its counterpart and every admin-scoped row.
    async fn delete_unit(
        &self,
        admin_id: Uuid,
        display_id: Option<Uuid>,
    ) -> Result<(), SignageServiceError>;
}

/// Repository for per-unit branding and the command mailbox.
pub trait UnitConfigRepository: Send + Sync {
    /// Return the admin's config, inserting one with defaults if missing.
    async fn get_or_create(
        &self,
        admin_id: Uuid,
        marquee_text: &str,
    ) -> Result<UnitConfig, SignageServiceError>;

    async fn update_branding(
        &self,
        admin_id: Uuid,
        patch: &BrandingPatch,
    ) -> Result<UnitConfig, SignageServiceError>;

    /// Overwrite the mailbox slot. Last writer wins.
    async fn set_command(
        &self,
        admin_id: Uuid,
        command: Command,
        at: DateTime<Utc>,
    ) -> Result<(), SignageServiceError>;

    /// Read and clear the mailbox slot as one atomic step.
    async fn take_command(&self, admin_id: Uuid) -> Result<Option<String>, SignageServiceError>;
}

pub trait RateRepository: Send + Sync {
    /// All rates for the admin, by `order` then creation.
    async fn list(&self, admin_id: Uuid) -> Result<Vec<ForexRate>, SignageServiceError>;
    async fn list_active(&self, admin_id: Uuid) -> Result<Vec<ForexRate>, SignageServiceError>;
    async fn find(&self, id: Uuid) -> Result<Option<ForexRate>, SignageServiceError>;
    async fn save(&self, rate: &ForexRate) -> Result<(), SignageServiceError>;
    async fn delete(&self, id: Uuid) -> Result<(), SignageServiceError>;
}

pub trait DepositRepository: Send + Sync {
    /// All tiers for the admin, by `tenor` then `order`.
    async fn list(&self, admin_id: Uuid) -> Result<Vec<DepositRate>, SignageServiceError>;
    async fn list_active(&self, admin_id: Uuid)
    -> Result<Vec<DepositRate>, SignageServiceError>;
    async fn find(&self, id: Uuid) -> Result<Option<DepositRate>, SignageServiceError>;
    async fn save(&self, deposit: &DepositRate) -> Result<(), SignageServiceError>;
    async fn delete(&self, id: Uuid) -> Result<(), SignageServiceError>;
}

pub trait VideoRepository: Send + Sync {
    async fn find(&self, admin_id: Uuid) -> Result<Option<VideoDisplay>, SignageServiceError>;

    /// Upsert the playlist and replace its sources in the given order.
    async fn replace(
        &self,
        admin_id: Uuid,
        active: bool,
        sources: &[String],
    ) -> Result<VideoDisplay, SignageServiceError>;
}

pub trait ActivityRepository: Send + Sync {
    async fn record(&self, entry: &ActivityEntry) -> Result<(), SignageServiceError>;

    /// The latest `limit` entries, newest first.
    async fn recent(&self, limit: u64) -> Result<Vec<ActivityRecord>, SignageServiceError>;
}

/// Fire-and-forget change fan-out to connected terminals.
///
/// Publishing never fails; a publisher with no listeners drops the signal.
pub trait ChangePublisher: Send + Sync {
    fn publish(&self, kind: ChangeKind);
}
