use uuid::Uuid;

use counterate_domain::change::ChangeKind;

use crate::domain::repository::{ChangePublisher, UnitConfigRepository};
use crate::domain::types::{BrandingPatch, UnitConfig};
use crate::error::SignageServiceError;

// ── GetBranding ──────────────────────────────────────────────────────────────

pub struct GetBrandingUseCase<C: UnitConfigRepository> {
    pub repo: C,
    pub marquee_text: String,
}

impl<C: UnitConfigRepository> GetBrandingUseCase<C> {
    pub async fn execute(&self, admin_id: Uuid) -> Result<UnitConfig, SignageServiceError> {
        self.repo.get_or_create(admin_id, &self.marquee_text).await
    }
}

// ── UpdateBranding ───────────────────────────────────────────────────────────

pub struct UpdateBrandingUseCase<C: UnitConfigRepository, P: ChangePublisher> {
    pub repo: C,
    pub notifier: P,
    pub marquee_text: String,
}

impl<C: UnitConfigRepository, P: ChangePublisher> UpdateBrandingUseCase<C, P> {
    pub async fn execute(
        &self,
        admin_id: Uuid,
        patch: BrandingPatch,
    ) -> Result<UnitConfig, SignageServiceError> {
        if patch.refresh_interval.is_some_and(|secs| secs <= 0) {
            return Err(SignageServiceError::MissingData);
        }
        self.repo.get_or_create(admin_id, &self.marquee_text).await?;
        let config = self.repo.update_branding(admin_id, &patch).await?;
        self.notifier.publish(ChangeKind::Branding);
        Ok(config)
    }
}
