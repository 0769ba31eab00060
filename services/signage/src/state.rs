use sea_orm::DatabaseConnection;

use crate::domain::types::{RepairPolicy, UnitDefaults};
use crate::infra::db::{
    DbActivityRepository, DbDepositRepository, DbIdentityRepository, DbRateRepository,
    DbUnitConfigRepository, DbVideoRepository,
};
use crate::infra::notifier::BroadcastNotifier;
use crate::usecase::pairing::ResolveUnitAdminUseCase;
use crate::usecase::snapshot::GetSnapshotUseCase;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub notifier: BroadcastNotifier,
    pub defaults: UnitDefaults,
    pub repair_policy: RepairPolicy,
}

impl AppState {
    pub fn identity_repo(&self) -> DbIdentityRepository {
        DbIdentityRepository {
            db: self.db.clone(),
        }
    }

    pub fn config_repo(&self) -> DbUnitConfigRepository {
        DbUnitConfigRepository {
            db: self.db.clone(),
        }
    }

    pub fn rate_repo(&self) -> DbRateRepository {
        DbRateRepository {
            db: self.db.clone(),
        }
    }

    pub fn deposit_repo(&self) -> DbDepositRepository {
        DbDepositRepository {
            db: self.db.clone(),
        }
    }

    pub fn video_repo(&self) -> DbVideoRepository {
        DbVideoRepository {
            db: self.db.clone(),
        }
    }

    pub fn activity_repo(&self) -> DbActivityRepository {
        DbActivityRepository {
            db: self.db.clone(),
        }
    }

    pub fn resolver(&self) -> ResolveUnitAdminUseCase<DbIdentityRepository> {
        ResolveUnitAdminUseCase {
            repo: self.identity_repo(),
            policy: self.repair_policy,
            defaults: self.defaults.clone(),
        }
    }

    pub fn snapshot_uc(
        &self,
    ) -> GetSnapshotUseCase<
        DbIdentityRepository,
        DbUnitConfigRepository,
        DbRateRepository,
        DbDepositRepository,
        DbVideoRepository,
    > {
        GetSnapshotUseCase {
            resolver: self.resolver(),
            configs: self.config_repo(),
            rates: self.rate_repo(),
            deposits: self.deposit_repo(),
            videos: self.video_repo(),
        }
    }
}
