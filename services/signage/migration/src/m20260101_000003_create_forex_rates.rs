use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ForexRates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ForexRates::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ForexRates::AdminId).uuid().not_null())
                    .col(ColumnDef::new(ForexRates::Currency).string().not_null())
                    .col(ColumnDef::new(ForexRates::CurrencyName).string().not_null())
                    .col(ColumnDef::new(ForexRates::TtBuy).double().not_null())
                    .col(ColumnDef::new(ForexRates::TtSell).double().not_null())
                    .col(ColumnDef::new(ForexRates::BankBuy).double().not_null())
                    .col(ColumnDef::new(ForexRates::BankSell).double().not_null())
                    .col(
                        ColumnDef::new(ForexRates::Order)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ForexRates::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ForexRates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ForexRates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ForexRates::Table, ForexRates::AdminId)
                            .to(Identities::Table, Identities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ForexRates::Table)
                    .col(ForexRates::AdminId)
                    .col(ForexRates::Order)
                    .name("idx_forex_rates_admin_id_order")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ForexRates::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ForexRates {
    Table,
    Id,
    AdminId,
    Currency,
    CurrencyName,
    TtBuy,
    TtSell,
    BankBuy,
    BankSell,
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
