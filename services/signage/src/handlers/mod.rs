pub mod admin;
pub mod display;
pub mod superadmin;

use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use counterate_auth_types::identity::IdentityHeaders;
use counterate_domain::command::Command;
use counterate_domain::identity::{Role, Status};

use crate::domain::types::Identity;
use crate::error::SignageServiceError;
use crate::state::AppState;
use crate::usecase::activity::RecordActivityUseCase;
use crate::usecase::session::CheckSessionUseCase;

/// The caller, loaded from the store and checked against its session.
///
/// Rejects with 401 when gateway headers are missing, the identity is gone or
/// inactive, or the session version is stale.
pub struct AuthedIdentity(pub Identity);

impl FromRequestParts<AppState> for AuthedIdentity {
    type Rejection = SignageServiceError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let headers = IdentityHeaders::from_parts(parts);
        let uc = CheckSessionUseCase {
            repo: state.identity_repo(),
        };
        async move {
            let headers = headers.map_err(|_| SignageServiceError::Unauthorized)?;
            uc.execute(headers.user_id, headers.session_version)
                .await
                .map(Self)
        }
    }
}

/// Handler for `GET /readyz`: ready once the store answers a ping.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            warn!(error = %e, "readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub(crate) fn require_role(identity: &Identity, role: Role) -> Result<(), SignageServiceError> {
    if identity.role != role {
        return Err(SignageServiceError::Forbidden);
    }
    Ok(())
}

/// First hop of `x-forwarded-for`, as set by the gateway.
pub(crate) fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

pub(crate) async fn record_activity(
    state: &AppState,
    actor: &Identity,
    headers: &HeaderMap,
    action: &str,
    details: String,
) {
    let uc = RecordActivityUseCase {
        repo: state.activity_repo(),
    };
    uc.execute(actor.id, action, details, client_ip(headers))
        .await;
}

pub(crate) fn parse_command(raw: &str) -> Result<Command, SignageServiceError> {
    raw.trim()
        .to_ascii_uppercase()
        .parse()
        .map_err(|_| SignageServiceError::InvalidCommand)
}

// ── Shared DTOs ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

#[derive(Deserialize, Default)]
pub struct CredentialRequest {
    /// Pre-hashed credential; omitted means the role's default.
    #[serde(default)]
    pub credential_hash: Option<String>,
}

#[derive(Serialize)]
pub struct IdentityResponse {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub status: Status,
    #[serde(serialize_with = "counterate_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "counterate_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Identity> for IdentityResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            username: identity.username,
            role: identity.role,
            status: identity.status,
            created_at: identity.created_at,
            updated_at: identity.updated_at,
        }
    }
}
