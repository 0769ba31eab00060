use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel as _, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionError,
    TransactionTrait,
    sea_query::{Expr, OnConflict, Query},
};
use uuid::Uuid;

use counterate_domain::command::Command;
use counterate_domain::identity::{Role, Status};
use counterate_signage_schema::{
    activity_logs, deposit_rates, forex_rates, identities, unit_configs, video_displays,
    video_sources,
};

use crate::domain::repository::{
    ActivityRepository, DepositRepository, IdentityRepository, RateRepository,
    UnitConfigRepository, VideoRepository,
};
use crate::domain::types::{
    ActivityEntry, ActivityRecord, BrandingPatch, DepositRate, ForexRate, Identity,
    IdentityPatch, NewUnit, PairingView, UnitConfig, UnitSummary, VideoDisplay,
};
use crate::error::SignageServiceError;

/// Postgres names the username unique constraint `<table>_<column>_key`.
const USERNAME_CONSTRAINT: &str = "identities_username_key";

// ── Identity repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIdentityRepository {
    pub db: DatabaseConnection,
}

impl IdentityRepository for DbIdentityRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, SignageServiceError> {
        let model = identities::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find identity by id")?;
        model.map(identity_from_model).transpose()
    }

    async fn find_pairing(&self, id: Uuid) -> Result<Option<PairingView>, SignageServiceError> {
        let Some(model) = identities::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find identity for pairing")?
        else {
            return Ok(None);
        };

        let points_to = match model.paired_user_id {
            Some(target) => identities::Entity::find_by_id(target)
                .one(&self.db)
                .await
                .context("find pointed-to identity")?,
            None => None,
        };
        let pointed_from = identities::Entity::find()
            .filter(identities::Column::PairedUserId.eq(id))
            .one(&self.db)
            .await
            .context("find pointing identity")?;

        Ok(Some(PairingView {
            identity: identity_from_model(model)?,
            points_to: points_to.map(identity_from_model).transpose()?,
            pointed_from: pointed_from.map(identity_from_model).transpose()?,
        }))
    }

    async fn find_adoptable_admin(&self) -> Result<Option<Identity>, SignageServiceError> {
        let model = identities::Entity::find()
            .filter(identities::Column::Role.eq(Role::Admin.as_str()))
            .filter(identities::Column::PairedUserId.is_null())
            .filter(identities::Column::Id.not_in_subquery(pointer_targets()))
            .order_by_asc(identities::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find adoptable admin")?;
        model.map(identity_from_model).transpose()
    }

    async fn adopt_pairing(
        &self,
        admin_id: Uuid,
        display_id: Uuid,
    ) -> Result<(), SignageServiceError> {
        // Compare-and-set: only an admin that is still unpaired on both ends is updated.
        let result = identities::Entity::update_many()
            .col_expr(identities::Column::PairedUserId, Expr::value(display_id))
            .col_expr(identities::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(identities::Column::Id.eq(admin_id))
            .filter(identities::Column::PairedUserId.is_null())
            .filter(identities::Column::Id.not_in_subquery(pointer_targets()))
            .exec(&self.db)
            .await;

        match result {
            Ok(r) if r.rows_affected == 1 => Ok(()),
            Ok(_) => Err(SignageServiceError::PairingConflict),
            Err(e) => Err(write_error(e, "adopt pairing")),
        }
    }

    async fn insert_counterpart(&self, identity: &Identity) -> Result<(), SignageServiceError> {
        identity_active_model(identity)
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "insert counterpart identity"))?;
        Ok(())
    }

    async fn create_identity(&self, identity: &Identity) -> Result<(), SignageServiceError> {
        identity_active_model(identity)
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "insert identity"))?;
        Ok(())
    }

    async fn create_unit(&self, unit: &NewUnit) -> Result<(), SignageServiceError> {
        let unit = unit.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    // The admin's pointer references the display, so the display goes first.
                    identity_active_model(&unit.display).insert(txn).await?;
                    identity_active_model(&unit.admin).insert(txn).await?;
                    config_active_model(&unit.config).insert(txn).await?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| write_error(flatten(e), "create unit"))
    }

    async fn list_units(&self) -> Result<Vec<UnitSummary>, SignageServiceError> {
        let admins = identities::Entity::find()
            .filter(identities::Column::Role.eq(Role::Admin.as_str()))
            .order_by_asc(identities::Column::Username)
            .all(&self.db)
            .await
            .context("list unit admins")?;
        if admins.is_empty() {
            return Ok(vec![]);
        }

        let admin_ids: Vec<Uuid> = admins.iter().map(|a| a.id).collect();
        let held: Vec<Uuid> = admins.iter().filter_map(|a| a.paired_user_id).collect();

        let counterparts = identities::Entity::find()
            .filter(
                identities::Column::Id
                    .is_in(held)
                    .or(identities::Column::PairedUserId.is_in(admin_ids.clone())),
            )
            .all(&self.db)
            .await
            .context("list unit counterparts")?;
        let configs = unit_configs::Entity::find()
            .filter(unit_configs::Column::AdminId.is_in(admin_ids))
            .all(&self.db)
            .await
            .context("list unit configs")?;

        let by_id: HashMap<Uuid, &identities::Model> =
            counterparts.iter().map(|c| (c.id, c)).collect();
        let by_pointer: HashMap<Uuid, &identities::Model> = counterparts
            .iter()
            .filter_map(|c| c.paired_user_id.map(|p| (p, c)))
            .collect();
        let marquees: HashMap<Uuid, String> = configs
            .into_iter()
            .map(|c| (c.admin_id, c.marquee_text))
            .collect();

        admins
            .into_iter()
            .map(|admin| {
                let display = admin
                    .paired_user_id
                    .and_then(|p| by_id.get(&p))
                    .or_else(|| by_pointer.get(&admin.id))
                    .map(|m| identity_from_model((*m).clone()))
                    .transpose()?;
                let marquee_text = marquees.get(&admin.id).cloned();
                Ok(UnitSummary {
                    admin: identity_from_model(admin)?,
                    display,
                    marquee_text,
                })
            })
            .collect()
    }

    async fn apply_patches(&self, patches: &[IdentityPatch]) -> Result<(), SignageServiceError> {
        let patches: Vec<IdentityPatch> = patches.iter().filter(|p| !p.is_empty()).cloned().collect();
        if patches.is_empty() {
            return Ok(());
        }
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    for patch in patches {
                        let mut update = identities::Entity::update_many()
                            .col_expr(identities::Column::UpdatedAt, Expr::value(now))
                            .filter(identities::Column::Id.eq(patch.id));
                        if let Some(username) = patch.username {
                            update = update
                                .col_expr(identities::Column::Username, Expr::value(username));
                        }
                        if let Some(hash) = patch.credential_hash {
                            update = update
                                .col_expr(identities::Column::CredentialHash, Expr::value(hash))
                                .col_expr(
                                    identities::Column::SessionVersion,
                                    Expr::col(identities::Column::SessionVersion).add(1),
                                );
                        }
                        if let Some(status) = patch.status {
                            update = update
                                .col_expr(identities::Column::Status, Expr::value(status.as_str()));
                        }
                        // An error here rolls back every earlier patch.
                        if update.exec(txn).await?.rows_affected == 0 {
                            return Err(DbErr::RecordNotUpdated);
                        }
                    }
                    Ok(())
                })
            })
            .await
            .map_err(|e| match flatten(e) {
                DbErr::RecordNotUpdated => SignageServiceError::IdentityNotFound,
                e => write_error(e, "apply identity patches"),
            })
    }

    async fn set_status(&self, ids: &[Uuid], status: Status) -> Result<(), SignageServiceError> {
        identities::Entity::update_many()
            .col_expr(identities::Column::Status, Expr::value(status.as_str()))
            .col_expr(identities::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(identities::Column::Id.is_in(ids.to_vec()))
            .exec(&self.db)
            .await
            .context("set identity status")?;
        Ok(())
    }

    async fn replace_credential(
        &self,
        id: Uuid,
        credential_hash: &str,
    ) -> Result<(), SignageServiceError> {
        let result = identities::Entity::update_many()
            .col_expr(
                identities::Column::CredentialHash,
                Expr::value(credential_hash),
            )
            .col_expr(
                identities::Column::SessionVersion,
                Expr::col(identities::Column::SessionVersion).add(1),
            )
            .col_expr(identities::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(identities::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("replace credential")?;
        if result.rows_affected == 0 {
            return Err(SignageServiceError::IdentityNotFound);
        }
        Ok(())
    }

    async fn delete_unit(
        &self,
        admin_id: Uuid,
        display_id: Option<Uuid>,
    ) -> Result<(), SignageServiceError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    // Scoped rows cascade from the admin via their foreign keys.
                    if let Some(display_id) = display_id {
                        identities::Entity::delete_by_id(display_id)
                            .exec(txn)
                            .await?;
                    }
                    identities::Entity::delete_by_id(admin_id).exec(txn).await?;
                    Ok(())
                })
            })
            .await
            .context("delete unit")?;
        Ok(())
    }
}

/// Ids that some identity already points at.
fn pointer_targets() -> sea_orm::sea_query::SelectStatement {
    Query::select()
        .column(identities::Column::PairedUserId)
        .from(identities::Entity)
        .and_where(identities::Column::PairedUserId.is_not_null())
        .to_owned()
}

fn identity_from_model(model: identities::Model) -> Result<Identity, SignageServiceError> {
    let role: Role = model
        .role
        .parse()
        .with_context(|| format!("identity {} has an unknown role", model.id))?;
    let status: Status = model
        .status
        .parse()
        .with_context(|| format!("identity {} has an unknown status", model.id))?;
    Ok(Identity {
        id: model.id,
        username: model.username,
        credential_hash: model.credential_hash,
        role,
        status,
        session_version: model.session_version,
        paired_user_id: model.paired_user_id,
        created_by: model.created_by,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn identity_active_model(identity: &Identity) -> identities::ActiveModel {
    identities::ActiveModel {
        id: Set(identity.id),
        username: Set(identity.username.clone()),
        credential_hash: Set(identity.credential_hash.clone()),
        role: Set(identity.role.as_str().to_owned()),
        status: Set(identity.status.as_str().to_owned()),
        session_version: Set(identity.session_version),
        paired_user_id: Set(identity.paired_user_id),
        created_by: Set(identity.created_by.clone()),
        created_at: Set(identity.created_at),
        updated_at: Set(identity.updated_at),
    }
}

fn flatten(err: TransactionError<DbErr>) -> DbErr {
    match err {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => e,
    }
}

/// Unique violations on the identities table map to domain errors; anything
/// else is internal.
fn write_error(err: DbErr, what: &'static str) -> SignageServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains(USERNAME_CONSTRAINT) => {
            SignageServiceError::UsernameTaken
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => SignageServiceError::PairingConflict,
        _ => SignageServiceError::Internal(anyhow::Error::new(err).context(what)),
    }
}

// ── Unit config repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUnitConfigRepository {
    pub db: DatabaseConnection,
}

impl UnitConfigRepository for DbUnitConfigRepository {
    async fn get_or_create(
        &self,
        admin_id: Uuid,
        marquee_text: &str,
    ) -> Result<UnitConfig, SignageServiceError> {
        let defaults = UnitConfig::new(admin_id, marquee_text.to_owned());
        unit_configs::Entity::insert(config_active_model(&defaults))
            .on_conflict(
                OnConflict::column(unit_configs::Column::AdminId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("ensure unit config")?;

        let model = unit_configs::Entity::find()
            .filter(unit_configs::Column::AdminId.eq(admin_id))
            .one(&self.db)
            .await
            .context("find unit config")?
            .ok_or(SignageServiceError::UnitNotFound)?;
        Ok(config_from_model(model))
    }

    async fn update_branding(
        &self,
        admin_id: Uuid,
        patch: &BrandingPatch,
    ) -> Result<UnitConfig, SignageServiceError> {
        let model = unit_configs::Entity::find()
            .filter(unit_configs::Column::AdminId.eq(admin_id))
            .one(&self.db)
            .await
            .context("find unit config for branding")?
            .ok_or(SignageServiceError::UnitNotFound)?;

        let mut am = model.into_active_model();
        if let Some(text) = &patch.marquee_text {
            am.marquee_text = Set(text.clone());
        }
        if let Some(theme) = &patch.theme {
            am.theme = Set(theme.clone());
        }
        if let Some(interval) = patch.refresh_interval {
            am.refresh_interval = Set(interval);
        }
        if let Some(show) = patch.show_clock {
            am.show_clock = Set(show);
        }
        if let Some(v) = &patch.left_title {
            am.left_title = Set(non_empty(v));
        }
        if let Some(v) = &patch.right_title {
            am.right_title = Set(non_empty(v));
        }
        if let Some(v) = &patch.left_logo_url {
            am.left_logo_url = Set(non_empty(v));
        }
        if let Some(v) = &patch.right_logo_url {
            am.right_logo_url = Set(non_empty(v));
        }
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.context("update branding")?;
        Ok(config_from_model(model))
    }

    async fn set_command(
        &self,
        admin_id: Uuid,
        command: Command,
        at: DateTime<Utc>,
    ) -> Result<(), SignageServiceError> {
        let result = unit_configs::Entity::update_many()
            .col_expr(
                unit_configs::Column::PendingCommand,
                Expr::value(command.as_str()),
            )
            .col_expr(unit_configs::Column::CommandUpdatedAt, Expr::value(at))
            .col_expr(unit_configs::Column::UpdatedAt, Expr::value(at))
            .filter(unit_configs::Column::AdminId.eq(admin_id))
            .exec(&self.db)
            .await
            .context("set pending command")?;
        if result.rows_affected == 0 {
            return Err(SignageServiceError::UnitNotFound);
        }
        Ok(())
    }

    async fn take_command(&self, admin_id: Uuid) -> Result<Option<String>, SignageServiceError> {
        let taken = self
            .db
            .transaction::<_, Option<String>, DbErr>(|txn| {
                Box::pin(async move {
                    // Row lock: a concurrent drain waits here and then sees the cleared slot.
                    let Some(model) = unit_configs::Entity::find()
                        .filter(unit_configs::Column::AdminId.eq(admin_id))
                        .lock_exclusive()
                        .one(txn)
                        .await?
                    else {
                        return Ok(None);
                    };
                    let Some(command) = model.pending_command.clone() else {
                        return Ok(None);
                    };
                    let mut am = model.into_active_model();
                    am.pending_command = Set(None);
                    am.updated_at = Set(Utc::now());
                    am.update(txn).await?;
                    Ok(Some(command))
                })
            })
            .await
            .context("take pending command")?;
        Ok(taken)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn config_from_model(model: unit_configs::Model) -> UnitConfig {
    UnitConfig {
        id: model.id,
        admin_id: model.admin_id,
        refresh_interval: model.refresh_interval,
        marquee_text: model.marquee_text,
        theme: model.theme,
        left_logo_url: model.left_logo_url,
        right_logo_url: model.right_logo_url,
        left_title: model.left_title,
        right_title: model.right_title,
        show_clock: model.show_clock,
        pending_command: model.pending_command,
        command_updated_at: model.command_updated_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn config_active_model(config: &UnitConfig) -> unit_configs::ActiveModel {
    unit_configs::ActiveModel {
        id: Set(config.id),
        admin_id: Set(config.admin_id),
        refresh_interval: Set(config.refresh_interval),
        marquee_text: Set(config.marquee_text.clone()),
        theme: Set(config.theme.clone()),
        left_logo_url: Set(config.left_logo_url.clone()),
        right_logo_url: Set(config.right_logo_url.clone()),
        left_title: Set(config.left_title.clone()),
        right_title: Set(config.right_title.clone()),
        show_clock: Set(config.show_clock),
        pending_command: Set(config.pending_command.clone()),
        command_updated_at: Set(config.command_updated_at),
        created_at: Set(config.created_at),
        updated_at: Set(config.updated_at),
    }
}

// ── Rate repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRateRepository {
    pub db: DatabaseConnection,
}

impl DbRateRepository {
    async fn list_filtered(
        &self,
        admin_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<ForexRate>, SignageServiceError> {
        let mut query =
            forex_rates::Entity::find().filter(forex_rates::Column::AdminId.eq(admin_id));
        if active_only {
            query = query.filter(forex_rates::Column::Active.eq(true));
        }
        let models = query
            .order_by_asc(forex_rates::Column::Order)
            .order_by_asc(forex_rates::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list forex rates")?;
        Ok(models.into_iter().map(rate_from_model).collect())
    }
}

impl RateRepository for DbRateRepository {
    async fn list(&self, admin_id: Uuid) -> Result<Vec<ForexRate>, SignageServiceError> {
        self.list_filtered(admin_id, false).await
    }

    async fn list_active(&self, admin_id: Uuid) -> Result<Vec<ForexRate>, SignageServiceError> {
        self.list_filtered(admin_id, true).await
    }

    async fn find(&self, id: Uuid) -> Result<Option<ForexRate>, SignageServiceError> {
        let model = forex_rates::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find forex rate")?;
        Ok(model.map(rate_from_model))
    }

    async fn save(&self, rate: &ForexRate) -> Result<(), SignageServiceError> {
        let am = forex_rates::ActiveModel {
            id: Set(rate.id),
            admin_id: Set(rate.admin_id),
            currency: Set(rate.currency.clone()),
            currency_name: Set(rate.currency_name.clone()),
            tt_buy: Set(rate.tt_buy),
            tt_sell: Set(rate.tt_sell),
            bank_buy: Set(rate.bank_buy),
            bank_sell: Set(rate.bank_sell),
            order: Set(rate.order),
            active: Set(rate.active),
            created_at: Set(rate.created_at),
            updated_at: Set(rate.updated_at),
        };
        forex_rates::Entity::insert(am)
            .on_conflict(
                OnConflict::column(forex_rates::Column::Id)
                    .update_columns([
                        forex_rates::Column::Currency,
                        forex_rates::Column::CurrencyName,
                        forex_rates::Column::TtBuy,
                        forex_rates::Column::TtSell,
                        forex_rates::Column::BankBuy,
                        forex_rates::Column::BankSell,
                        forex_rates::Column::Order,
                        forex_rates::Column::Active,
                        forex_rates::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert forex rate")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), SignageServiceError> {
        forex_rates::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete forex rate")?;
        Ok(())
    }
}

fn rate_from_model(model: forex_rates::Model) -> ForexRate {
    ForexRate {
        id: model.id,
        admin_id: model.admin_id,
        currency: model.currency,
        currency_name: model.currency_name,
        tt_buy: model.tt_buy,
        tt_sell: model.tt_sell,
        bank_buy: model.bank_buy,
        bank_sell: model.bank_sell,
        order: model.order,
        active: model.active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Deposit repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDepositRepository {
    pub db: DatabaseConnection,
}

impl DbDepositRepository {
    async fn list_filtered(
        &self,
        admin_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<DepositRate>, SignageServiceError> {
        let mut query =
            deposit_rates::Entity::find().filter(deposit_rates::Column::AdminId.eq(admin_id));
        if active_only {
            query = query.filter(deposit_rates::Column::Active.eq(true));
        }
        let models = query
            .order_by_asc(deposit_rates::Column::Tenor)
            .order_by_asc(deposit_rates::Column::Order)
            .all(&self.db)
            .await
            .context("list deposit rates")?;
        Ok(models.into_iter().map(deposit_from_model).collect())
    }
}

impl DepositRepository for DbDepositRepository {
    async fn list(&self, admin_id: Uuid) -> Result<Vec<DepositRate>, SignageServiceError> {
        self.list_filtered(admin_id, false).await
    }

    async fn list_active(
        &self,
        admin_id: Uuid,
    ) -> Result<Vec<DepositRate>, SignageServiceError> {
        self.list_filtered(admin_id, true).await
    }

    async fn find(&self, id: Uuid) -> Result<Option<DepositRate>, SignageServiceError> {
        let model = deposit_rates::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find deposit rate")?;
        Ok(model.map(deposit_from_model))
    }

    async fn save(&self, deposit: &DepositRate) -> Result<(), SignageServiceError> {
        let am = deposit_rates::ActiveModel {
            id: Set(deposit.id),
            admin_id: Set(deposit.admin_id),
            tenor: Set(deposit.tenor),
            rate: Set(deposit.rate),
            order: Set(deposit.order),
            active: Set(deposit.active),
            created_at: Set(deposit.created_at),
            updated_at: Set(deposit.updated_at),
        };
        deposit_rates::Entity::insert(am)
            .on_conflict(
                OnConflict::column(deposit_rates::Column::Id)
                    .update_columns([
                        deposit_rates::Column::Tenor,
                        deposit_rates::Column::Rate,
                        deposit_rates::Column::Order,
                        deposit_rates::Column::Active,
                        deposit_rates::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert deposit rate")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), SignageServiceError> {
        deposit_rates::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete deposit rate")?;
        Ok(())
    }
}

fn deposit_from_model(model: deposit_rates::Model) -> DepositRate {
    DepositRate {
        id: model.id,
        admin_id: model.admin_id,
        tenor: model.tenor,
        rate: model.rate,
        order: model.order,
        active: model.active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Video repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVideoRepository {
    pub db: DatabaseConnection,
}

impl VideoRepository for DbVideoRepository {
    async fn find(&self, admin_id: Uuid) -> Result<Option<VideoDisplay>, SignageServiceError> {
        let Some(display) = video_displays::Entity::find()
            .filter(video_displays::Column::AdminId.eq(admin_id))
            .one(&self.db)
            .await
            .context("find video display")?
        else {
            return Ok(None);
        };
        let sources = video_sources::Entity::find()
            .filter(video_sources::Column::VideoDisplayId.eq(display.id))
            .order_by_asc(video_sources::Column::Order)
            .all(&self.db)
            .await
            .context("list video sources")?;

        Ok(Some(VideoDisplay {
            id: display.id,
            admin_id: display.admin_id,
            active: display.active,
            sources: sources.into_iter().map(|s| s.url).collect(),
            updated_at: display.updated_at,
        }))
    }

    async fn replace(
        &self,
        admin_id: Uuid,
        active: bool,
        sources: &[String],
    ) -> Result<VideoDisplay, SignageServiceError> {
        let sources = sources.to_vec();
        let video = self
            .db
            .transaction::<_, VideoDisplay, DbErr>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    let existing = video_displays::Entity::find()
                        .filter(video_displays::Column::AdminId.eq(admin_id))
                        .lock_exclusive()
                        .one(txn)
                        .await?;

                    let display = match existing {
                        Some(model) => {
                            let mut am = model.into_active_model();
                            am.active = Set(active);
                            am.updated_at = Set(now);
                            am.update(txn).await?
                        }
                        None => {
                            video_displays::ActiveModel {
                                id: Set(Uuid::now_v7()),
                                admin_id: Set(admin_id),
                                active: Set(active),
                                created_at: Set(now),
                                updated_at: Set(now),
                            }
                            .insert(txn)
                            .await?
                        }
                    };

                    video_sources::Entity::delete_many()
                        .filter(video_sources::Column::VideoDisplayId.eq(display.id))
                        .exec(txn)
                        .await?;
                    for (position, url) in sources.iter().enumerate() {
                        video_sources::ActiveModel {
                            id: Set(Uuid::now_v7()),
                            video_display_id: Set(display.id),
                            url: Set(url.clone()),
                            order: Set(position as i32),
                        }
                        .insert(txn)
                        .await?;
                    }

                    Ok(VideoDisplay {
                        id: display.id,
                        admin_id,
                        active: display.active,
                        sources,
                        updated_at: display.updated_at,
                    })
                })
            })
            .await
            .context("replace video playlist")?;
        Ok(video)
    }
}

// ── Activity repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbActivityRepository {
    pub db: DatabaseConnection,
}

impl ActivityRepository for DbActivityRepository {
    async fn record(&self, entry: &ActivityEntry) -> Result<(), SignageServiceError> {
        activity_logs::ActiveModel {
            id: Set(entry.id),
            user_id: Set(entry.user_id),
            action: Set(entry.action.clone()),
            details: Set(entry.details.clone()),
            ip_address: Set(entry.ip_address.clone()),
            created_at: Set(entry.created_at),
        }
        .insert(&self.db)
        .await
        .context("record activity")?;
        Ok(())
    }

    async fn recent(&self, limit: u64) -> Result<Vec<ActivityRecord>, SignageServiceError> {
        let rows = activity_logs::Entity::find()
            .order_by_desc(activity_logs::Column::CreatedAt)
            .order_by_desc(activity_logs::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list recent activity")?;

        let mut actor_ids: Vec<Uuid> = rows.iter().map(|r| r.user_id).collect();
        actor_ids.sort_unstable();
        actor_ids.dedup();
        let actors: HashMap<Uuid, identities::Model> = if actor_ids.is_empty() {
            HashMap::new()
        } else {
            identities::Entity::find()
                .filter(identities::Column::Id.is_in(actor_ids))
                .all(&self.db)
                .await
                .context("load activity actors")?
                .into_iter()
                .map(|m| (m.id, m))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|row| {
                let actor = actors.get(&row.user_id);
                ActivityRecord {
                    username: actor.map(|a| a.username.clone()),
                    role: actor.and_then(|a| a.role.parse().ok()),
                    entry: ActivityEntry {
                        id: row.id,
                        user_id: row.user_id,
                        action: row.action,
                        details: row.details,
                        ip_address: row.ip_address,
                        created_at: row.created_at,
                    },
                }
            })
            .collect())
    }
}
