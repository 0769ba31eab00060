use chrono::Utc;
use uuid::Uuid;

use counterate_domain::change::ChangeKind;
use counterate_domain::currency::{currency_name, normalize_code};

use crate::domain::repository::{ChangePublisher, DepositRepository, RateRepository};
use crate::domain::types::{DepositRate, ForexRate};
use crate::error::SignageServiceError;

// ── ListRates ────────────────────────────────────────────────────────────────

pub struct ListRatesUseCase<R: RateRepository> {
    pub repo: R,
}

impl<R: RateRepository> ListRatesUseCase<R> {
    pub async fn execute(&self, admin_id: Uuid) -> Result<Vec<ForexRate>, SignageServiceError> {
        self.repo.list(admin_id).await
    }
}

// ── SaveRate ─────────────────────────────────────────────────────────────────

pub struct SaveRateInput {
    /// Existing rate to update; `None` creates a new one.
    pub id: Option<Uuid>,
    pub currency: String,
    pub tt_buy: f64,
    pub tt_sell: f64,
    pub bank_buy: f64,
    pub bank_sell: f64,
    pub order: i32,
    pub active: bool,
}

pub struct SaveRateUseCase<R: RateRepository, P: ChangePublisher> {
    pub repo: R,
    pub notifier: P,
}

impl<R: RateRepository, P: ChangePublisher> SaveRateUseCase<R, P> {
    pub async fn execute(
        &self,
        admin_id: Uuid,
        input: SaveRateInput,
    ) -> Result<ForexRate, SignageServiceError> {
        let currency = normalize_code(&input.currency);
        if currency.is_empty() {
            return Err(SignageServiceError::MissingData);
        }

        let now = Utc::now();
        let (id, created_at) = match input.id {
            Some(id) => {
                let existing = self
                    .repo
                    .find(id)
                    .await?
                    .ok_or(SignageServiceError::RateNotFound)?;
                if existing.admin_id != admin_id {
                    return Err(SignageServiceError::Forbidden);
                }
                (id, existing.created_at)
            }
            None => (Uuid::now_v7(), now),
        };

        let rate = ForexRate {
            id,
            admin_id,
            currency_name: currency_name(&currency),
            currency,
            tt_buy: input.tt_buy,
            tt_sell: input.tt_sell,
            bank_buy: input.bank_buy,
            bank_sell: input.bank_sell,
            order: input.order,
            active: input.active,
            created_at,
            updated_at: now,
        };
        self.repo.save(&rate).await?;
        self.notifier.publish(ChangeKind::Rates);
        Ok(rate)
    }
}

// ── DeleteRate ───────────────────────────────────────────────────────────────

pub struct DeleteRateUseCase<R: RateRepository, P: ChangePublisher> {
    pub repo: R,
    pub notifier: P,
}

impl<R: RateRepository, P: ChangePublisher> DeleteRateUseCase<R, P> {
    pub async fn execute(&self, admin_id: Uuid, id: Uuid) -> Result<(), SignageServiceError> {
        let rate = self
            .repo
            .find(id)
            .await?
            .ok_or(SignageServiceError::RateNotFound)?;
        if rate.admin_id != admin_id {
            return Err(SignageServiceError::Forbidden);
        }
        self.repo.delete(id).await?;
        self.notifier.publish(ChangeKind::Rates);
        Ok(())
    }
}

// ── ListDeposits ─────────────────────────────────────────────────────────────

pub struct ListDepositsUseCase<D: DepositRepository> {
    pub repo: D,
}

impl<D: DepositRepository> ListDepositsUseCase<D> {
    pub async fn execute(&self, admin_id: Uuid) -> Result<Vec<DepositRate>, SignageServiceError> {
        self.repo.list(admin_id).await
    }
}

// ── SaveDeposit ──────────────────────────────────────────────────────────────

pub struct SaveDepositInput {
    pub id: Option<Uuid>,
    pub tenor: i32,
    pub rate: f64,
    pub order: i32,
    pub active: bool,
}

pub struct SaveDepositUseCase<D: DepositRepository, P: ChangePublisher> {
    pub repo: D,
    pub notifier: P,
}

impl<D: DepositRepository, P: ChangePublisher> SaveDepositUseCase<D, P> {
    pub async fn execute(
        &self,
        admin_id: Uuid,
        input: SaveDepositInput,
    ) -> Result<DepositRate, SignageServiceError> {
        if input.tenor <= 0 {
            return Err(SignageServiceError::MissingData);
        }

        let now = Utc::now();
        let (id, created_at) = match input.id {
            Some(id) => {
                let existing = self
                    .repo
                    .find(id)
                    .await?
                    .ok_or(SignageServiceError::DepositNotFound)?;
                if existing.admin_id != admin_id {
                    return Err(SignageServiceError::Forbidden);
                }
                (id, existing.created_at)
            }
            None => (Uuid::now_v7(), now),
        };

        let deposit = DepositRate {
            id,
            admin_id,
            tenor: input.tenor,
            rate: input.rate,
            order: input.order,
            active: input.active,
            created_at,
            updated_at: now,
        };
        self.repo.save(&deposit).await?;
        self.notifier.publish(ChangeKind::Deposits);
        Ok(deposit)
    }
}

// ── DeleteDeposit ────────────────────────────────────────────────────────────

pub struct DeleteDepositUseCase<D: DepositRepository, P: ChangePublisher> {
    pub repo: D,
    pub notifier: P,
}

impl<D: DepositRepository, P: ChangePublisher> DeleteDepositUseCase<D, P> {
    pub async fn execute(&self, admin_id: Uuid, id: Uuid) -> Result<(), SignageServiceError> {
        let deposit = self
            .repo
            .find(id)
            .await?
            .ok_or(SignageServiceError::DepositNotFound)?;
        if deposit.admin_id != admin_id {
            return Err(SignageServiceError::Forbidden);
        }
        self.repo.delete(id).await?;
        self.notifier.publish(ChangeKind::Deposits);
        Ok(())
    }
}
