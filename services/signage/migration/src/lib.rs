use sea_orm_migration::prelude::*;

mod m20260101_000001_create_identities;
mod m20260101_000002_create_unit_configs;
mod m20260101_000003_create_forex_rates;
mod m20260101_000004_create_deposit_rates;
mod m20260101_000005_create_video_displays;
mod m20260101_000006_create_activity_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_identities::Migration),
            Box::new(m20260101_000002_create_unit_configs::Migration),
            Box::new(m20260101_000003_create_forex_rates::Migration),
            Box::new(m20260101_000004_create_deposit_rates::Migration),
            Box::new(m20260101_000005_create_video_displays::Migration),
            Box::new(m20260101_000006_create_activity_logs::Migration),
        ]
    }
}
