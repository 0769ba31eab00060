use tracing::warn;
use uuid::Uuid;

use counterate_domain::snapshot::Snapshot;

use crate::domain::repository::{
    DepositRepository, IdentityRepository, RateRepository, UnitConfigRepository, VideoRepository,
};
use crate::error::SignageServiceError;
use crate::usecase::pairing::ResolveUnitAdminUseCase;

// ── GetSnapshot ──────────────────────────────────────────────────────────────

pub struct GetSnapshotUseCase<I, C, R, D, V>
where
    I: IdentityRepository,
    C: UnitConfigRepository,
    R: RateRepository,
    D: DepositRepository,
    V: VideoRepository,
{
    pub resolver: ResolveUnitAdminUseCase<I>,
    pub configs: C,
    pub rates: R,
    pub deposits: D,
    pub videos: V,
}

impl<I, C, R, D, V> GetSnapshotUseCase<I, C, R, D, V>
where
    I: IdentityRepository,
    C: UnitConfigRepository,
    R: RateRepository,
    D: DepositRepository,
    V: VideoRepository,
{
    /// Current snapshot for the unit `identity_id` belongs to.
    ///
    /// `None` means unconfigured: no resolvable unit, or a store failure.
    /// Every call re-reads current state.
    pub async fn execute(&self, identity_id: Uuid) -> Option<Snapshot> {
        match self.read(identity_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, identity_id = %identity_id, "snapshot degraded to unconfigured");
                None
            }
        }
    }

    async fn read(&self, identity_id: Uuid) -> Result<Option<Snapshot>, SignageServiceError> {
        let Some(admin) = self.resolver.execute(identity_id).await? else {
            return Ok(None);
        };

        let (rates, deposits, video, config) = tokio::try_join!(
            self.rates.list_active(admin.id),
            self.deposits.list_active(admin.id),
            self.videos.find(admin.id),
            self.configs
                .get_or_create(admin.id, &self.resolver.defaults.marquee_text),
        )?;

        Ok(Some(Snapshot {
            unit_admin_id: admin.id,
            rates: rates.iter().map(|r| r.entry()).collect(),
            deposits: deposits.iter().map(|d| d.entry()).collect(),
            video: video.map(|v| v.playlist()),
            config: config.display_config(),
        }))
    }
}
