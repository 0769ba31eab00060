use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VideoDisplays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VideoDisplays::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VideoDisplays::AdminId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(VideoDisplays::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(VideoDisplays::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(VideoDisplays::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(VideoDisplays::Table, VideoDisplays::AdminId)
                            .to(Identities::Table, Identities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VideoSources::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VideoSources::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VideoSources::VideoDisplayId).uuid().not_null())
                    .col(ColumnDef::new(VideoSources::Url).text().not_null())
                    .col(ColumnDef::new(VideoSources::Order).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(VideoSources::Table, VideoSources::VideoDisplayId)
                            .to(VideoDisplays::Table, VideoDisplays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(VideoSources::Table)
                    .col(VideoSources::VideoDisplayId)
                    .name("idx_video_sources_video_display_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VideoSources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VideoDisplays::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VideoDisplays {
    Table,
    Id,
    AdminId,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum VideoSources {
    Table,
    Id,
    VideoDisplayId,
    Url,
    Order,
}

#[derive(Iden)]
enum Identities {
    Table,
    Id,
}
