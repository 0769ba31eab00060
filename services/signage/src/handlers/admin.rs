use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use counterate_domain::identity::Role;
use counterate_domain::snapshot::DisplayConfig;

use crate::domain::types::{BrandingPatch, DepositRate, ForexRate, VideoDisplay};
use crate::error::SignageServiceError;
use crate::handlers::{
    AuthedIdentity, CommandRequest, CredentialRequest, IdentityResponse, parse_command,
    record_activity, require_role,
};
use crate::state::AppState;
use crate::usecase::activity;
use crate::usecase::branding::{GetBrandingUseCase, UpdateBrandingUseCase};
use crate::usecase::command::SetCommandUseCase;
use crate::usecase::rates::{
    DeleteDepositUseCase, DeleteRateUseCase, ListDepositsUseCase, ListRatesUseCase,
    SaveDepositInput, SaveDepositUseCase, SaveRateInput, SaveRateUseCase,
};
use crate::usecase::unit::{GetUnitDisplayUseCase, ResetCredentialUseCase};
use crate::usecase::video::{GetVideoUseCase, ReplaceVideoUseCase};

fn default_true() -> bool {
    true
}

// ── Forex rates ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RateRequest {
    pub id: Option<Uuid>,
    pub currency: String,
    pub tt_buy: f64,
    pub tt_sell: f64,
    pub bank_buy: f64,
    pub bank_sell: f64,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Serialize)]
pub struct RateResponse {
    pub id: Uuid,
    pub currency: String,
    pub currency_name: String,
    pub tt_buy: f64,
    pub tt_sell: f64,
    pub bank_buy: f64,
    pub bank_sell: f64,
    pub order: i32,
    pub active: bool,
    #[serde(serialize_with = "counterate_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ForexRate> for RateResponse {
    fn from(rate: ForexRate) -> Self {
        Self {
            id: rate.id,
            currency: rate.currency,
            currency_name: rate.currency_name,
            tt_buy: rate.tt_buy,
            tt_sell: rate.tt_sell,
            bank_buy: rate.bank_buy,
            bank_sell: rate.bank_sell,
            order: rate.order,
            active: rate.active,
            updated_at: rate.updated_at,
        }
    }
}

pub async fn list_rates(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<RateResponse>>, SignageServiceError> {
    require_role(&identity, Role::Admin)?;
    let uc = ListRatesUseCase {
        repo: state.rate_repo(),
    };
    let rates = uc.execute(identity.id).await?;
    Ok(Json(rates.into_iter().map(RateResponse::from).collect()))
}

pub async fn save_rate(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RateRequest>,
) -> Result<Json<RateResponse>, SignageServiceError> {
    require_role(&identity, Role::Admin)?;
    let uc = SaveRateUseCase {
        repo: state.rate_repo(),
        notifier: state.notifier.clone(),
    };
    let rate = uc
        .execute(
            identity.id,
            SaveRateInput {
                id: body.id,
                currency: body.currency,
                tt_buy: body.tt_buy,
                tt_sell: body.tt_sell,
                bank_buy: body.bank_buy,
                bank_sell: body.bank_sell,
                order: body.order,
                active: body.active,
            },
        )
        .await?;
    record_activity(
        &state,
        &identity,
        &headers,
        activity::UPDATE_RATES,
        format!("Saved rate {}", rate.currency),
    )
    .await;
    Ok(Json(rate.into()))
}

pub async fn delete_rate(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, SignageServiceError> {
    require_role(&identity, Role::Admin)?;
    let uc = DeleteRateUseCase {
        repo: state.rate_repo(),
        notifier: state.notifier.clone(),
    };
    uc.execute(identity.id, id).await?;
    record_activity(
        &state,
        &identity,
        &headers,
        activity::UPDATE_RATES,
        format!("Deleted rate {id}"),
    )
    .await;
    Ok(StatusCode::NO_CONTENT)
}

// ── Deposit rates ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DepositRequest {
    pub id: Option<Uuid>,
    pub tenor: i32,
    pub rate: f64,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Serialize)]
pub struct DepositResponse {
    pub id: Uuid,
    pub tenor: i32,
    pub rate: f64,
    pub order: i32,
    pub active: bool,
    #[serde(serialize_with = "counterate_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<DepositRate> for DepositResponse {
    fn from(deposit: DepositRate) -> Self {
        Self {
            id: deposit.id,
            tenor: deposit.tenor,
            rate: deposit.rate,
            order: deposit.order,
            active: deposit.active,
            updated_at: deposit.updated_at,
        }
    }
}

pub async fn list_deposits(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<DepositResponse>>, SignageServiceError> {
    require_role(&identity, Role::Admin)?;
    let uc = ListDepositsUseCase {
        repo: state.deposit_repo(),
    };
    let deposits = uc.execute(identity.id).await?;
    Ok(Json(deposits.into_iter().map(DepositResponse::from).collect()))
}

pub async fn save_deposit(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<DepositRequest>,
) -> Result<Json<DepositResponse>, SignageServiceError> {
    require_role(&identity, Role::Admin)?;
    let uc = SaveDepositUseCase {
        repo: state.deposit_repo(),
        notifier: state.notifier.clone(),
    };
    let deposit = uc
        .execute(
            identity.id,
            SaveDepositInput {
                id: body.id,
                tenor: body.tenor,
                rate: body.rate,
                order: body.order,
                active: body.active,
            },
        )
        .await?;
    record_activity(
        &state,
        &identity,
        &headers,
        activity::UPDATE_DEPOSITS,
        format!("Saved {}-month deposit rate", deposit.tenor),
    )
    .await;
    Ok(Json(deposit.into()))
}

pub async fn delete_deposit(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, SignageServiceError> {
    require_role(&identity, Role::Admin)?;
    let uc = DeleteDepositUseCase {
        repo: state.deposit_repo(),
        notifier: state.notifier.clone(),
    };
    uc.execute(identity.id, id).await?;
    record_activity(
        &state,
        &identity,
        &headers,
        activity::UPDATE_DEPOSITS,
        format!("Deleted deposit rate {id}"),
    )
    .await;
    Ok(StatusCode::NO_CONTENT)
}

// ── Video playlist ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VideoRequest {
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Serialize)]
pub struct VideoResponse {
    pub active: bool,
    pub sources: Vec<String>,
}

impl From<Option<VideoDisplay>> for VideoResponse {
    fn from(video: Option<VideoDisplay>) -> Self {
        match video {
            Some(v) => Self {
                active: v.active,
                sources: v.sources,
            },
            None => Self {
                active: false,
                sources: vec![],
            },
        }
    }
}

pub async fn get_video(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
) -> Result<Json<VideoResponse>, SignageServiceError> {
    require_role(&identity, Role::Admin)?;
    let uc = GetVideoUseCase {
        repo: state.video_repo(),
    };
    let video = uc.execute(identity.id).await?;
    Ok(Json(video.into()))
}

pub async fn replace_video(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<VideoRequest>,
) -> Result<Json<VideoResponse>, SignageServiceError> {
    require_role(&identity, Role::Admin)?;
    let uc = ReplaceVideoUseCase {
        repo: state.video_repo(),
        notifier: state.notifier.clone(),
    };
    let video = uc.execute(identity.id, body.active, body.sources).await?;
    record_activity(
        &state,
        &identity,
        &headers,
        activity::UPDATE_VIDEO,
        format!("Playlist now has {} sources", video.sources.len()),
    )
    .await;
    Ok(Json(Some(video).into()))
}

// ── Branding ─────────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct BrandingRequest {
    pub marquee_text: Option<String>,
    pub theme: Option<String>,
    pub refresh_interval: Option<i32>,
    pub left_title: Option<String>,
    pub right_title: Option<String>,
    /// URL or data URI; an empty string removes the logo.
    pub left_logo_url: Option<String>,
    pub right_logo_url: Option<String>,
    pub show_clock: Option<bool>,
}

pub async fn get_branding(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
) -> Result<Json<DisplayConfig>, SignageServiceError> {
    require_role(&identity, Role::Admin)?;
    let uc = GetBrandingUseCase {
        repo: state.config_repo(),
        marquee_text: state.defaults.marquee_text.clone(),
    };
    let config = uc.execute(identity.id).await?;
    Ok(Json(config.display_config()))
}

pub async fn update_branding(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<BrandingRequest>,
) -> Result<Json<DisplayConfig>, SignageServiceError> {
    require_role(&identity, Role::Admin)?;
    let uc = UpdateBrandingUseCase {
        repo: state.config_repo(),
        notifier: state.notifier.clone(),
        marquee_text: state.defaults.marquee_text.clone(),
    };
    let patch = BrandingPatch {
        marquee_text: body.marquee_text,
        theme: body.theme,
        refresh_interval: body.refresh_interval,
        left_title: body.left_title,
        right_title: body.right_title,
        left_logo_url: body.left_logo_url,
        right_logo_url: body.right_logo_url,
        show_clock: body.show_clock,
    };
    let config = uc.execute(identity.id, patch).await?;
    record_activity(
        &state,
        &identity,
        &headers,
        activity::UPDATE_BRANDING,
        "Updated branding".to_owned(),
    )
    .await;
    Ok(Json(config.display_config()))
}

// ── Display management ───────────────────────────────────────────────────────

pub async fn get_display(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
) -> Result<Json<IdentityResponse>, SignageServiceError> {
    require_role(&identity, Role::Admin)?;
    let uc = GetUnitDisplayUseCase {
        repo: state.identity_repo(),
    };
    let display = uc
        .execute(identity.id)
        .await?
        .ok_or(SignageServiceError::IdentityNotFound)?;
    Ok(Json(display.into()))
}

pub async fn send_command(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CommandRequest>,
) -> Result<StatusCode, SignageServiceError> {
    require_role(&identity, Role::Admin)?;
    let command = parse_command(&body.command)?;
    let uc = SetCommandUseCase {
        identities: state.identity_repo(),
        configs: state.config_repo(),
        marquee_text: state.defaults.marquee_text.clone(),
    };
    uc.execute(&identity, identity.id, command).await?;
    record_activity(
        &state,
        &identity,
        &headers,
        activity::SEND_COMMAND,
        format!("Sent {command} to own display"),
    )
    .await;
    Ok(StatusCode::ACCEPTED)
}

pub async fn reset_display_credential(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CredentialRequest>,
) -> Result<StatusCode, SignageServiceError> {
    require_role(&identity, Role::Admin)?;
    let display = GetUnitDisplayUseCase {
        repo: state.identity_repo(),
    }
    .execute(identity.id)
    .await?
    .ok_or(SignageServiceError::IdentityNotFound)?;

    let uc = ResetCredentialUseCase {
        repo: state.identity_repo(),
        defaults: state.defaults.clone(),
    };
    uc.execute(display.id, body.credential_hash).await?;
    record_activity(
        &state,
        &identity,
        &headers,
        activity::RESET_CREDENTIAL,
        format!("Reset credential for display {}", display.username),
    )
    .await;
    Ok(StatusCode::NO_CONTENT)
}
