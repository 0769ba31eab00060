use uuid::Uuid;

use counterate_domain::identity::Status;

use crate::domain::repository::IdentityRepository;
use crate::domain::types::Identity;
use crate::error::SignageServiceError;

// ── CheckSession ─────────────────────────────────────────────────────────────

pub struct CheckSessionUseCase<I: IdentityRepository> {
    pub repo: I,
}

impl<I: IdentityRepository> CheckSessionUseCase<I> {
    /// Load the caller and confirm the session is still current: the identity
    /// exists, is active, and has not re-logged in or been reset since.
    pub async fn execute(
        &self,
        user_id: Uuid,
        session_version: i32,
    ) -> Result<Identity, SignageServiceError> {
        let identity = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(SignageServiceError::Unauthorized)?;
        if identity.status != Status::Active || identity.session_version != session_version {
            return Err(SignageServiceError::Unauthorized);
        }
        Ok(identity)
    }
}
