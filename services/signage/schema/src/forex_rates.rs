use sea_orm::entity::prelude::*;

/// Exchange-rate row scoped to one admin.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "forex_rates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub admin_id: Uuid,
    pub currency: String,
    pub currency_name: String,
    pub tt_buy: f64,
    pub tt_sell: f64,
    pub bank_buy: f64,
    pub bank_sell: f64,
    pub order: i32,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::identities::Entity",
        from = "Column::AdminId",
        to = "super::identities::Column::Id"
    )]
    Admin,
}

impl Related<super::identities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
