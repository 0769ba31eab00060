use sea_orm_migration::prelude::*;

use counterate_signage_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
