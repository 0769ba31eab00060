use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UnitConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UnitConfigs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UnitConfigs::AdminId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(UnitConfigs::RefreshInterval)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(ColumnDef::new(UnitConfigs::MarqueeText).text().not_null())
                    .col(
                        ColumnDef::new(UnitConfigs::Theme)
                            .string()
                            .not_null()
                            .default("banking-blue"),
                    )
                    .col(ColumnDef::new(UnitConfigs::LeftLogoUrl).text())
                    .col(ColumnDef::new(UnitConfigs::RightLogoUrl).text())
                    .col(ColumnDef::new(UnitConfigs::LeftTitle).string())
                    .col(ColumnDef::new(UnitConfigs::RightTitle).string())
                    .col(
                        ColumnDef::new(UnitConfigs::ShowClock)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(UnitConfigs::PendingCommand).string())
                    .col(ColumnDef::new(UnitConfigs::CommandUpdatedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(UnitConfigs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UnitConfigs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UnitConfigs::Table, UnitConfigs::AdminId)
                            .to(Identities::Table, Identities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UnitConfigs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UnitConfigs {
    Table,
    Id,
    AdminId,
    RefreshInterval,
    MarqueeText,
    Theme,
    LeftLogoUrl,
    RightLogoUrl,
    LeftTitle,
    RightTitle,
    ShowClock,
    PendingCommand,
    CommandUpdatedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Identities {
    Table,
    Id,
}
