use sea_orm::entity::prelude::*;

/// Authenticatable principal. `paired_user_id` is the one-directional,
/// unique pairing pointer; either side of a unit may hold it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "identities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub credential_hash: String,
    pub role: String,
    pub status: String,
    pub session_version: i32,
    #[sea_orm(unique)]
    pub paired_user_id: Option<Uuid>,
    pub created_by: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::PairedUserId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    PairedUser,
    #[sea_orm(has_one = "super::unit_configs::Entity")]
    UnitConfig,
    #[sea_orm(has_many = "super::forex_rates::Entity")]
    ForexRates,
    #[sea_orm(has_many = "super::deposit_rates::Entity")]
    DepositRates,
    #[sea_orm(has_one = "super::video_displays::Entity")]
    VideoDisplay,
}

impl Related<super::unit_configs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UnitConfig.def()
    }
}

impl Related<super::forex_rates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ForexRates.def()
    }
}

impl Related<super::deposit_rates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DepositRates.def()
    }
}

impl Related<super::video_displays::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VideoDisplay.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
