use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use counterate_domain::identity::{Role, Status};

use crate::domain::types::{ActivityRecord, UnitSummary};
use crate::error::SignageServiceError;
use crate::handlers::{
    AuthedIdentity, CommandRequest, CredentialRequest, IdentityResponse, parse_command,
    record_activity, require_role,
};
use crate::state::AppState;
use crate::usecase::account::{CreateSuperAdminUseCase, ProfileInput, UpdateProfileUseCase};
use crate::usecase::activity::{self, ListActivityUseCase};
use crate::usecase::command::SetCommandUseCase;
use crate::usecase::unit::{
    CreateUnitInput, CreateUnitUseCase, DeleteUnitUseCase, ListUnitsUseCase,
    ResetCredentialUseCase, SetStatusUseCase, UpdateUnitInput, UpdateUnitUseCase,
};

// ── Request / response types ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUnitRequest {
    pub username: String,
    pub display_username: Option<String>,
    pub admin_credential_hash: Option<String>,
    pub display_credential_hash: Option<String>,
    pub marquee_text: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct UpdateUnitRequest {
    pub username: Option<String>,
    pub display_username: Option<String>,
    pub admin_credential_hash: Option<String>,
    pub display_credential_hash: Option<String>,
    pub status: Option<Status>,
    pub marquee_text: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: Status,
}

#[derive(Deserialize)]
pub struct CreateSuperAdminRequest {
    pub username: String,
    #[serde(default)]
    pub credential_hash: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct ProfileRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub credential_hash: Option<String>,
}

#[derive(Serialize)]
pub struct ActivityResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: Option<String>,
    pub role: Option<Role>,
    pub action: String,
    pub details: String,
    pub ip_address: Option<String>,
    #[serde(serialize_with = "counterate_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ActivityRecord> for ActivityResponse {
    fn from(record: ActivityRecord) -> Self {
        Self {
            id: record.entry.id,
            user_id: record.entry.user_id,
            username: record.username,
            role: record.role,
            action: record.entry.action,
            details: record.entry.details,
            ip_address: record.entry.ip_address,
            created_at: record.entry.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct UnitResponse {
    pub admin: IdentityResponse,
    pub display: Option<IdentityResponse>,
    pub marquee_text: Option<String>,
}

impl From<UnitSummary> for UnitResponse {
    fn from(unit: UnitSummary) -> Self {
        Self {
            admin: unit.admin.into(),
            display: unit.display.map(IdentityResponse::from),
            marquee_text: unit.marquee_text,
        }
    }
}

// ── GET /superadmin/units ────────────────────────────────────────────────────

pub async fn list_units(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<UnitResponse>>, SignageServiceError> {
    require_role(&identity, Role::SuperAdmin)?;
    let uc = ListUnitsUseCase {
        repo: state.identity_repo(),
    };
    let units = uc.execute().await?;
    Ok(Json(units.into_iter().map(UnitResponse::from).collect()))
}

// ── POST /superadmin/units ───────────────────────────────────────────────────

pub async fn create_unit(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateUnitRequest>,
) -> Result<(StatusCode, Json<UnitResponse>), SignageServiceError> {
    require_role(&identity, Role::SuperAdmin)?;
    let uc = CreateUnitUseCase {
        repo: state.identity_repo(),
        defaults: state.defaults.clone(),
    };
    let unit = uc
        .execute(
            &identity,
            CreateUnitInput {
                username: body.username,
                display_username: body.display_username,
                admin_credential_hash: body.admin_credential_hash,
                display_credential_hash: body.display_credential_hash,
                marquee_text: body.marquee_text,
            },
        )
        .await?;
    record_activity(
        &state,
        &identity,
        &headers,
        activity::CREATE_UNIT,
        format!("Created unit {}", unit.admin.username),
    )
    .await;
    Ok((StatusCode::CREATED, Json(unit.into())))
}

// ── PATCH /superadmin/units/{admin_id} ───────────────────────────────────────

pub async fn update_unit(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(admin_id): Path<Uuid>,
    Json(body): Json<UpdateUnitRequest>,
) -> Result<StatusCode, SignageServiceError> {
    require_role(&identity, Role::SuperAdmin)?;
    let uc = UpdateUnitUseCase {
        identities: state.identity_repo(),
        configs: state.config_repo(),
        notifier: state.notifier.clone(),
        marquee_text: state.defaults.marquee_text.clone(),
    };
    uc.execute(
        admin_id,
        UpdateUnitInput {
            username: body.username,
            display_username: body.display_username,
            admin_credential_hash: body.admin_credential_hash,
            display_credential_hash: body.display_credential_hash,
            status: body.status,
            marquee_text: body.marquee_text,
        },
    )
    .await?;
    record_activity(
        &state,
        &identity,
        &headers,
        activity::UPDATE_UNIT,
        format!("Updated unit {admin_id}"),
    )
    .await;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /superadmin/units/{admin_id} ──────────────────────────────────────

pub async fn delete_unit(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(admin_id): Path<Uuid>,
) -> Result<StatusCode, SignageServiceError> {
    require_role(&identity, Role::SuperAdmin)?;
    let uc = DeleteUnitUseCase {
        repo: state.identity_repo(),
    };
    uc.execute(admin_id).await?;
    record_activity(
        &state,
        &identity,
        &headers,
        activity::DELETE_UNIT,
        format!("Deleted unit {admin_id}"),
    )
    .await;
    Ok(StatusCode::NO_CONTENT)
}

// ── PATCH /superadmin/identities/{id}/status ─────────────────────────────────

pub async fn set_status(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusRequest>,
) -> Result<StatusCode, SignageServiceError> {
    require_role(&identity, Role::SuperAdmin)?;
    let uc = SetStatusUseCase {
        repo: state.identity_repo(),
    };
    uc.execute(id, body.status).await?;
    record_activity(
        &state,
        &identity,
        &headers,
        activity::UPDATE_STATUS,
        format!("Updated status for {id} to {}", body.status),
    )
    .await;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /superadmin/identities/{id}/credential ──────────────────────────────

pub async fn reset_credential(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<CredentialRequest>,
) -> Result<StatusCode, SignageServiceError> {
    require_role(&identity, Role::SuperAdmin)?;
    let uc = ResetCredentialUseCase {
        repo: state.identity_repo(),
        defaults: state.defaults.clone(),
    };
    uc.execute(id, body.credential_hash).await?;
    record_activity(
        &state,
        &identity,
        &headers,
        activity::RESET_CREDENTIAL,
        format!("Reset credential for {id}"),
    )
    .await;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /superadmin/units/{admin_id}/command ────────────────────────────────

pub async fn send_command(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(admin_id): Path<Uuid>,
    Json(body): Json<CommandRequest>,
) -> Result<StatusCode, SignageServiceError> {
    require_role(&identity, Role::SuperAdmin)?;
    let command = parse_command(&body.command)?;
    let uc = SetCommandUseCase {
        identities: state.identity_repo(),
        configs: state.config_repo(),
        marquee_text: state.defaults.marquee_text.clone(),
    };
    uc.execute(&identity, admin_id, command).await?;
    record_activity(
        &state,
        &identity,
        &headers,
        activity::SEND_COMMAND,
        format!("Sent {command} to unit {admin_id}"),
    )
    .await;
    Ok(StatusCode::ACCEPTED)
}

// ── GET /superadmin/activity ─────────────────────────────────────────────────

pub async fn list_activity(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<ActivityResponse>>, SignageServiceError> {
    require_role(&identity, Role::SuperAdmin)?;
    let uc = ListActivityUseCase {
        repo: state.activity_repo(),
    };
    let records = uc.execute().await?;
    Ok(Json(records.into_iter().map(ActivityResponse::from).collect()))
}

// ── POST /superadmin/admins ──────────────────────────────────────────────────

pub async fn create_super_admin(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateSuperAdminRequest>,
) -> Result<(StatusCode, Json<IdentityResponse>), SignageServiceError> {
    require_role(&identity, Role::SuperAdmin)?;
    let uc = CreateSuperAdminUseCase {
        repo: state.identity_repo(),
        defaults: state.defaults.clone(),
    };
    let created = uc
        .execute(&identity, &body.username, body.credential_hash)
        .await?;
    record_activity(
        &state,
        &identity,
        &headers,
        activity::CREATE_SUPER_ADMIN,
        format!("Created super-admin {}", created.username),
    )
    .await;
    Ok((StatusCode::CREATED, Json(created.into())))
}

// ── PATCH /superadmin/profile ────────────────────────────────────────────────

pub async fn update_profile(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ProfileRequest>,
) -> Result<StatusCode, SignageServiceError> {
    require_role(&identity, Role::SuperAdmin)?;
    let uc = UpdateProfileUseCase {
        repo: state.identity_repo(),
    };
    let changed = uc
        .execute(
            &identity,
            ProfileInput {
                username: body.username,
                credential_hash: body.credential_hash,
            },
        )
        .await?;
    if changed {
        record_activity(
            &state,
            &identity,
            &headers,
            activity::UPDATE_PROFILE,
            "Updated own super-admin profile".to_owned(),
        )
        .await;
    }
    Ok(StatusCode::NO_CONTENT)
}
