use sea_orm::entity::prelude::*;

/// One URL in a video playlist.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "video_sources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub video_display_id: Uuid,
    pub url: String,
    pub order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::video_displays::Entity",
        from = "Column::VideoDisplayId",
        to = "super::video_displays::Column::Id"
    )]
    VideoDisplay,
}

impl Related<super::video_displays::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VideoDisplay.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
