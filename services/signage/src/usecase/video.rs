use uuid::Uuid;

use counterate_domain::change::ChangeKind;
use counterate_domain::video::normalize_video_url;

use crate::domain::repository::{ChangePublisher, VideoRepository};
use crate::domain::types::VideoDisplay;
use crate::error::SignageServiceError;

// ── GetVideo ─────────────────────────────────────────────────────────────────

pub struct GetVideoUseCase<V: VideoRepository> {
    pub repo: V,
}

impl<V: VideoRepository> GetVideoUseCase<V> {
    pub async fn execute(&self, admin_id: Uuid) -> Result<Option<VideoDisplay>, SignageServiceError> {
        self.repo.find(admin_id).await
    }
}

// ── ReplaceVideo ─────────────────────────────────────────────────────────────

pub struct ReplaceVideoUseCase<V: VideoRepository, P: ChangePublisher> {
    pub repo: V,
    pub notifier: P,
}

impl<V: VideoRepository, P: ChangePublisher> ReplaceVideoUseCase<V, P> {
    /// Replace the playlist. Blank entries are dropped and YouTube links
    /// rewritten to embed URLs; list position becomes play order.
    pub async fn execute(
        &self,
        admin_id: Uuid,
        active: bool,
        sources: Vec<String>,
    ) -> Result<VideoDisplay, SignageServiceError> {
        let sources: Vec<String> = sources
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(normalize_video_url)
            .collect();

        let video = self.repo.replace(admin_id, active, &sources).await?;
        self.notifier.publish(ChangeKind::Video);
        Ok(video)
    }
}
