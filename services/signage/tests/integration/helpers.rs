use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use counterate_domain::change::ChangeKind;
use counterate_domain::command::Command;
use counterate_domain::identity::{Role, Status};

use counterate_signage::domain::repository::{
    ActivityRepository, ChangePublisher, DepositRepository, IdentityRepository, RateRepository,
    UnitConfigRepository, VideoRepository,
};
use counterate_signage::domain::types::{
    ActivityEntry, ActivityRecord, BrandingPatch, DepositRate, ForexRate, Identity,
    IdentityPatch, NewUnit, PairingView, RepairPolicy, UnitConfig, UnitDefaults, UnitSummary,
    VideoDisplay,
};
use counterate_signage::error::SignageServiceError;
use counterate_signage::usecase::pairing::ResolveUnitAdminUseCase;
use counterate_signage::usecase::snapshot::GetSnapshotUseCase;

// ── MemoryStore ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct Tables {
    identities: Vec<Identity>,
    configs: Vec<UnitConfig>,
    rates: Vec<ForexRate>,
    deposits: Vec<DepositRate>,
    videos: Vec<VideoDisplay>,
    activity: Vec<ActivityEntry>,
}

impl Tables {
    /// The two unique indexes on `identities`.
    fn check_unique(&self, candidate: &Identity) -> Result<(), SignageServiceError> {
        let others = self.identities.iter().filter(|i| i.id != candidate.id);
        for other in others {
            if other.username == candidate.username {
                return Err(SignageServiceError::UsernameTaken);
            }
            if candidate.paired_user_id.is_some() && other.paired_user_id == candidate.paired_user_id
            {
                return Err(SignageServiceError::PairingConflict);
            }
        }
        Ok(())
    }

    fn is_pointer_target(&self, id: Uuid) -> bool {
        self.identities
            .iter()
            .any(|i| i.paired_user_id == Some(id))
    }

    fn identity_mut(&mut self, id: Uuid) -> Result<&mut Identity, SignageServiceError> {
        self.identities
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(SignageServiceError::IdentityNotFound)
    }

    fn config_mut(&mut self, admin_id: Uuid) -> Result<&mut UnitConfig, SignageServiceError> {
        self.configs
            .iter_mut()
            .find(|c| c.admin_id == admin_id)
            .ok_or(SignageServiceError::UnitNotFound)
    }
}

/// In-memory stand-in for every repository, enforcing the same uniqueness
/// rules as the database. Clones share state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn insert_identity(&self, identity: Identity) {
        self.tables.lock().unwrap().identities.push(identity);
    }

    pub fn identity(&self, id: Uuid) -> Option<Identity> {
        self.tables
            .lock()
            .unwrap()
            .identities
            .iter()
            .find(|i| i.id == id)
            .cloned()
    }

    pub fn identities(&self) -> Vec<Identity> {
        self.tables.lock().unwrap().identities.clone()
    }

    pub fn config(&self, admin_id: Uuid) -> Option<UnitConfig> {
        self.tables
            .lock()
            .unwrap()
            .configs
            .iter()
            .find(|c| c.admin_id == admin_id)
            .cloned()
    }

    pub fn rate_count(&self) -> usize {
        self.tables.lock().unwrap().rates.len()
    }

    pub fn activity(&self) -> Vec<ActivityEntry> {
        self.tables.lock().unwrap().activity.clone()
    }

    /// Ids of every identity holding a pointer to `target`.
    pub fn pointers_to(&self, target: Uuid) -> Vec<Uuid> {
        self.tables
            .lock()
            .unwrap()
            .identities
            .iter()
            .filter(|i| i.paired_user_id == Some(target))
            .map(|i| i.id)
            .collect()
    }
}

impl IdentityRepository for MemoryStore {
    async fn create_identity(&self, identity: &Identity) -> Result<(), SignageServiceError> {
        let mut tables = self.tables.lock().unwrap();
        tables.check_unique(identity)?;
        tables.identities.push(identity.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, SignageServiceError> {
        Ok(self.identity(id))
    }

    async fn find_pairing(&self, id: Uuid) -> Result<Option<PairingView>, SignageServiceError> {
        // Lets concurrent callers interleave between read and write.
        tokio::task::yield_now().await;
        let tables = self.tables.lock().unwrap();
        let Some(identity) = tables.identities.iter().find(|i| i.id == id).cloned() else {
            return Ok(None);
        };
        let points_to = identity
            .paired_user_id
            .and_then(|target| tables.identities.iter().find(|i| i.id == target).cloned());
        let pointed_from = tables
            .identities
            .iter()
            .find(|i| i.paired_user_id == Some(id))
            .cloned();
        Ok(Some(PairingView {
            identity,
            points_to,
            pointed_from,
        }))
    }

    async fn find_adoptable_admin(&self) -> Result<Option<Identity>, SignageServiceError> {
        tokio::task::yield_now().await;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .identities
            .iter()
            .filter(|i| i.role == Role::Admin && i.paired_user_id.is_none())
            .filter(|i| !tables.is_pointer_target(i.id))
            .min_by_key(|i| i.created_at)
            .cloned())
    }

    async fn adopt_pairing(
        &self,
        admin_id: Uuid,
        display_id: Uuid,
    ) -> Result<(), SignageServiceError> {
        let mut tables = self.tables.lock().unwrap();
        let target_taken = tables.is_pointer_target(admin_id) || tables.is_pointer_target(display_id);
        let admin = tables.identity_mut(admin_id)?;
        if admin.paired_user_id.is_some() || target_taken {
            return Err(SignageServiceError::PairingConflict);
        }
        admin.paired_user_id = Some(display_id);
        admin.updated_at = Utc::now();
        Ok(())
    }

    async fn insert_counterpart(&self, identity: &Identity) -> Result<(), SignageServiceError> {
        let mut tables = self.tables.lock().unwrap();
        tables.check_unique(identity)?;
        tables.identities.push(identity.clone());
        Ok(())
    }

    async fn create_unit(&self, unit: &NewUnit) -> Result<(), SignageServiceError> {
        let mut tables = self.tables.lock().unwrap();
        tables.check_unique(&unit.display)?;
        tables.check_unique(&unit.admin)?;
        if unit.admin.username == unit.display.username {
            return Err(SignageServiceError::UsernameTaken);
        }
        tables.identities.push(unit.display.clone());
        tables.identities.push(unit.admin.clone());
        tables.configs.push(unit.config.clone());
        Ok(())
    }

    async fn list_units(&self) -> Result<Vec<UnitSummary>, SignageServiceError> {
        let tables = self.tables.lock().unwrap();
        let mut units: Vec<UnitSummary> = tables
            .identities
            .iter()
            .filter(|i| i.role == Role::Admin)
            .map(|admin| {
                let display = tables
                    .identities
                    .iter()
                    .find(|d| {
                        d.role == Role::Display
                            && (admin.paired_user_id == Some(d.id)
                                || d.paired_user_id == Some(admin.id))
                    })
                    .cloned();
                let marquee_text = tables
                    .configs
                    .iter()
                    .find(|c| c.admin_id == admin.id)
                    .map(|c| c.marquee_text.clone());
                UnitSummary {
                    admin: admin.clone(),
                    display,
                    marquee_text,
                }
            })
            .collect();
        units.sort_by(|a, b| a.admin.username.cmp(&b.admin.username));
        Ok(units)
    }

    async fn apply_patches(&self, patches: &[IdentityPatch]) -> Result<(), SignageServiceError> {
        let mut tables = self.tables.lock().unwrap();
        // Stage on a copy so a failing patch leaves nothing behind.
        let mut staged = Tables {
            identities: tables.identities.clone(),
            ..Tables::default()
        };
        for patch in patches.iter().filter(|p| !p.is_empty()) {
            let mut updated = staged.identity_mut(patch.id)?.clone();
            if let Some(username) = &patch.username {
                updated.username = username.clone();
            }
            if let Some(hash) = &patch.credential_hash {
                updated.credential_hash = hash.clone();
                updated.session_version += 1;
            }
            if let Some(status) = patch.status {
                updated.status = status;
            }
            updated.updated_at = Utc::now();
            staged.check_unique(&updated)?;
            *staged.identity_mut(patch.id)? = updated;
        }
        tables.identities = staged.identities;
        Ok(())
    }

    async fn set_status(&self, ids: &[Uuid], status: Status) -> Result<(), SignageServiceError> {
        let mut tables = self.tables.lock().unwrap();
        for identity in tables.identities.iter_mut().filter(|i| ids.contains(&i.id)) {
            identity.status = status;
            identity.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn replace_credential(
        &self,
        id: Uuid,
        credential_hash: &str,
    ) -> Result<(), SignageServiceError> {
        let mut tables = self.tables.lock().unwrap();
        let identity = tables.identity_mut(id)?;
        identity.credential_hash = credential_hash.to_owned();
        identity.session_version += 1;
        identity.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_unit(
        &self,
        admin_id: Uuid,
        display_id: Option<Uuid>,
    ) -> Result<(), SignageServiceError> {
        let mut tables = self.tables.lock().unwrap();
        tables
            .identities
            .retain(|i| i.id != admin_id && Some(i.id) != display_id);
        tables.configs.retain(|c| c.admin_id != admin_id);
        tables.rates.retain(|r| r.admin_id != admin_id);
        tables.deposits.retain(|d| d.admin_id != admin_id);
        tables.videos.retain(|v| v.admin_id != admin_id);
        Ok(())
    }
}

impl UnitConfigRepository for MemoryStore {
    async fn get_or_create(
        &self,
        admin_id: Uuid,
        marquee_text: &str,
    ) -> Result<UnitConfig, SignageServiceError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(config) = tables.configs.iter().find(|c| c.admin_id == admin_id) {
            return Ok(config.clone());
        }
        let config = UnitConfig::new(admin_id, marquee_text.to_owned());
        tables.configs.push(config.clone());
        Ok(config)
    }

    async fn update_branding(
        &self,
        admin_id: Uuid,
        patch: &BrandingPatch,
    ) -> Result<UnitConfig, SignageServiceError> {
        let mut tables = self.tables.lock().unwrap();
        let config = tables.config_mut(admin_id)?;
        let text = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        if let Some(marquee) = &patch.marquee_text {
            config.marquee_text = marquee.clone();
        }
        if let Some(theme) = &patch.theme {
            config.theme = theme.clone();
        }
        if let Some(interval) = patch.refresh_interval {
            config.refresh_interval = interval;
        }
        if let Some(show) = patch.show_clock {
            config.show_clock = show;
        }
        if patch.left_title.is_some() {
            config.left_title = text(&patch.left_title);
        }
        if patch.right_title.is_some() {
            config.right_title = text(&patch.right_title);
        }
        if patch.left_logo_url.is_some() {
            config.left_logo_url = text(&patch.left_logo_url);
        }
        if patch.right_logo_url.is_some() {
            config.right_logo_url = text(&patch.right_logo_url);
        }
        config.updated_at = Utc::now();
        Ok(config.clone())
    }

    async fn set_command(
        &self,
        admin_id: Uuid,
        command: Command,
        at: DateTime<Utc>,
    ) -> Result<(), SignageServiceError> {
        let mut tables = self.tables.lock().unwrap();
        let config = tables.config_mut(admin_id)?;
        config.pending_command = Some(command.as_str().to_owned());
        config.command_updated_at = Some(at);
        Ok(())
    }

    async fn take_command(&self, admin_id: Uuid) -> Result<Option<String>, SignageServiceError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables
            .configs
            .iter_mut()
            .find(|c| c.admin_id == admin_id)
            .and_then(|c| c.pending_command.take()))
    }
}

impl RateRepository for MemoryStore {
    async fn list(&self, admin_id: Uuid) -> Result<Vec<ForexRate>, SignageServiceError> {
        let tables = self.tables.lock().unwrap();
        let mut rates: Vec<ForexRate> = tables
            .rates
            .iter()
            .filter(|r| r.admin_id == admin_id)
            .cloned()
            .collect();
        rates.sort_by_key(|r| (r.order, r.created_at));
        Ok(rates)
    }

    async fn list_active(&self, admin_id: Uuid) -> Result<Vec<ForexRate>, SignageServiceError> {
        let rates = RateRepository::list(self, admin_id).await?;
        Ok(rates.into_iter().filter(|r| r.active).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<ForexRate>, SignageServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.rates.iter().find(|r| r.id == id).cloned())
    }

    async fn save(&self, rate: &ForexRate) -> Result<(), SignageServiceError> {
        let mut tables = self.tables.lock().unwrap();
        tables.rates.retain(|r| r.id != rate.id);
        tables.rates.push(rate.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), SignageServiceError> {
        self.tables.lock().unwrap().rates.retain(|r| r.id != id);
        Ok(())
    }
}

impl DepositRepository for MemoryStore {
    async fn list(&self, admin_id: Uuid) -> Result<Vec<DepositRate>, SignageServiceError> {
        let tables = self.tables.lock().unwrap();
        let mut deposits: Vec<DepositRate> = tables
            .deposits
            .iter()
            .filter(|d| d.admin_id == admin_id)
            .cloned()
            .collect();
        deposits.sort_by_key(|d| (d.tenor, d.order));
        Ok(deposits)
    }

    async fn list_active(
        &self,
        admin_id: Uuid,
    ) -> Result<Vec<DepositRate>, SignageServiceError> {
        let deposits = DepositRepository::list(self, admin_id).await?;
        Ok(deposits.into_iter().filter(|d| d.active).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<DepositRate>, SignageServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.deposits.iter().find(|d| d.id == id).cloned())
    }

    async fn save(&self, deposit: &DepositRate) -> Result<(), SignageServiceError> {
        let mut tables = self.tables.lock().unwrap();
        tables.deposits.retain(|d| d.id != deposit.id);
        tables.deposits.push(deposit.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), SignageServiceError> {
        self.tables.lock().unwrap().deposits.retain(|d| d.id != id);
        Ok(())
    }
}

impl VideoRepository for MemoryStore {
    async fn find(&self, admin_id: Uuid) -> Result<Option<VideoDisplay>, SignageServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.videos.iter().find(|v| v.admin_id == admin_id).cloned())
    }

    async fn replace(
        &self,
        admin_id: Uuid,
        active: bool,
        sources: &[String],
    ) -> Result<VideoDisplay, SignageServiceError> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables
            .videos
            .iter()
            .find(|v| v.admin_id == admin_id)
            .map_or_else(Uuid::now_v7, |v| v.id);
        tables.videos.retain(|v| v.admin_id != admin_id);
        let video = VideoDisplay {
            id,
            admin_id,
            active,
            sources: sources.to_vec(),
            updated_at: Utc::now(),
        };
        tables.videos.push(video.clone());
        Ok(video)
    }
}

impl ActivityRepository for MemoryStore {
    async fn record(&self, entry: &ActivityEntry) -> Result<(), SignageServiceError> {
        self.tables.lock().unwrap().activity.push(entry.clone());
        Ok(())
    }

    async fn recent(&self, limit: u64) -> Result<Vec<ActivityRecord>, SignageServiceError> {
        let tables = self.tables.lock().unwrap();
        let mut entries = tables.activity.clone();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(entries
            .into_iter()
            .take(limit as usize)
            .map(|entry| {
                let actor = tables.identities.iter().find(|i| i.id == entry.user_id);
                ActivityRecord {
                    username: actor.map(|a| a.username.clone()),
                    role: actor.map(|a| a.role),
                    entry,
                }
            })
            .collect())
    }
}

// ── RecordingNotifier ────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub published: Arc<Mutex<Vec<ChangeKind>>>,
}

impl RecordingNotifier {
    pub fn published(&self) -> Vec<ChangeKind> {
        self.published.lock().unwrap().clone()
    }
}

impl ChangePublisher for RecordingNotifier {
    fn publish(&self, kind: ChangeKind) {
        self.published.lock().unwrap().push(kind);
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn identity(username: &str, role: Role) -> Identity {
    Identity::new(username.to_owned(), "hash".to_owned(), role)
}

/// Admin `A`, display `D`, with the admin holding the pointer.
pub fn seed_unit(store: &MemoryStore, admin: &str, display: &str) -> (Identity, Identity) {
    let display = identity(display, Role::Display);
    let mut admin = identity(admin, Role::Admin);
    admin.paired_user_id = Some(display.id);
    store.insert_identity(display.clone());
    store.insert_identity(admin.clone());
    (admin, display)
}

pub fn resolver(store: &MemoryStore, policy: RepairPolicy) -> ResolveUnitAdminUseCase<MemoryStore> {
    ResolveUnitAdminUseCase {
        repo: store.clone(),
        policy,
        defaults: UnitDefaults::default(),
    }
}

pub fn snapshot_uc(
    store: &MemoryStore,
) -> GetSnapshotUseCase<MemoryStore, MemoryStore, MemoryStore, MemoryStore, MemoryStore> {
    GetSnapshotUseCase {
        resolver: resolver(store, RepairPolicy::AdoptOrCreate),
        configs: store.clone(),
        rates: store.clone(),
        deposits: store.clone(),
        videos: store.clone(),
    }
}
