use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::domain::repository::ActivityRepository;
use crate::domain::types::{ActivityEntry, ActivityRecord};
use crate::error::SignageServiceError;

pub const CREATE_UNIT: &str = "CREATE_UNIT";
pub const UPDATE_UNIT: &str = "UPDATE_UNIT";
pub const DELETE_UNIT: &str = "DELETE_UNIT";
pub const UPDATE_STATUS: &str = "UPDATE_STATUS";
pub const RESET_CREDENTIAL: &str = "RESET_CREDENTIAL";
pub const SEND_COMMAND: &str = "SEND_COMMAND";
pub const UPDATE_RATES: &str = "UPDATE_RATES";
pub const UPDATE_DEPOSITS: &str = "UPDATE_DEPOSITS";
pub const UPDATE_VIDEO: &str = "UPDATE_VIDEO";
pub const UPDATE_BRANDING: &str = "UPDATE_BRANDING";
pub const CREATE_SUPER_ADMIN: &str = "CREATE_SUPER_ADMIN";
pub const UPDATE_PROFILE: &str = "UPDATE_PROFILE";

/// How many entries the audit view returns.
pub const RECENT_ACTIVITY_LIMIT: u64 = 100;

// ── RecordActivity ───────────────────────────────────────────────────────────

pub struct RecordActivityUseCase<A: ActivityRepository> {
    pub repo: A,
}

impl<A: ActivityRepository> RecordActivityUseCase<A> {
    /// Best-effort audit write. Failures are logged and never surface.
    pub async fn execute(
        &self,
        user_id: Uuid,
        action: &str,
        details: String,
        ip_address: Option<String>,
    ) {
        let entry = ActivityEntry {
            id: Uuid::now_v7(),
            user_id,
            action: action.to_owned(),
            details,
            ip_address,
            created_at: Utc::now(),
        };
        if let Err(e) = self.repo.record(&entry).await {
            warn!(error = %e, user_id = %user_id, action, "activity log write failed");
        }
    }
}

// ── ListActivity ─────────────────────────────────────────────────────────────

pub struct ListActivityUseCase<A: ActivityRepository> {
    pub repo: A,
}

impl<A: ActivityRepository> ListActivityUseCase<A> {
    pub async fn execute(&self) -> Result<Vec<ActivityRecord>, SignageServiceError> {
        self.repo.recent(RECENT_ACTIVITY_LIMIT).await
    }
}
