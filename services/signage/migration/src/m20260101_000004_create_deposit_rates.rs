use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DepositRates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DepositRates::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DepositRates::AdminId).uuid().not_null())
                    .col(ColumnDef::new(DepositRates::Tenor).integer().not_null())
                    .col(ColumnDef::new(DepositRates::Rate).double().not_null())
                    .col(
                        ColumnDef::new(DepositRates::Order)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DepositRates::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(DepositRates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DepositRates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DepositRates::Table, DepositRates::AdminId)
                            .to(Identities::Table, Identities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(DepositRates::Table)
                    .col(DepositRates::AdminId)
                    .col(DepositRates::Tenor)
                    .name("idx_deposit_rates_admin_id_tenor")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DepositRates::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DepositRates {
    Table,
    Id,
    AdminId,
    Tenor,
    Rate,
    Order,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Identities {
    Table,
    Id,
}
