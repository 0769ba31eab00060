use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Identities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Identities::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Identities::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Identities::CredentialHash).string().not_null())
                    .col(ColumnDef::new(Identities::Role).string().not_null())
                    .col(
                        ColumnDef::new(Identities::Status)
                            .string()
                            .not_null()
                            .default("ACTIVE"),
                    )
                    .col(
                        ColumnDef::new(Identities::SessionVersion)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    // The pairing invariant: at most one identity may point at a given id.
                    .col(ColumnDef::new(Identities::PairedUserId).uuid().unique_key())
                    .col(ColumnDef::new(Identities::CreatedBy).string())
                    .col(
                        ColumnDef::new(Identities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Identities::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_identities_paired_user_id")
                            .from(Identities::Table, Identities::PairedUserId)
                            .to(Identities::Table, Identities::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Identities::Table)
                    .col(Identities::Role)
                    .name("idx_identities_role")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Identities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Identities {
    Table,
    Id,
    Username,
    CredentialHash,
    Role,
    Status,
    SessionVersion,
    PairedUserId,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
