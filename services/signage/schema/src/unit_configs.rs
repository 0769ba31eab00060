use sea_orm::entity::prelude::*;

/// Per-unit display configuration plus the single-slot command mailbox.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "unit_configs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub admin_id: Uuid,
    pub refresh_interval: i32,
    pub marquee_text: String,
    pub theme: String,
    pub left_logo_url: Option<String>,
    pub right_logo_url: Option<String>,
    pub left_title: Option<String>,
    pub right_title: Option<String>,
    pub show_clock: bool,
    pub pending_command: Option<String>,
    pub command_updated_at: Option<chrono::DateTime<chrono::Utc>>,
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
