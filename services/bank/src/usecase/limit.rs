use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use kolo_domain::limits::{Channel, Counter, Limits};

use crate::domain::repository::{
    ApproveOutcome, CancelOutcome, LedgerRepository, ReserveOutcome, UpgradeRequestRepository,
};
use crate::domain::types::{
    LimitUpgradeFields, UpgradeLimitRequest, UpgradeStatus, validate_limit_upgrade,
};
use crate::error::BankServiceError;

/// Reserve `amount` against one channel's daily ceiling.
///
/// The single-transaction check is stateless; the daily check and the
/// increment happen in one atomic store operation, so two concurrent
/// transfers can never both pass against a stale counter.
pub async fn check_and_reserve<L: LedgerRepository>(
    ledger: &L,
    user_id: Uuid,
    channel: Channel,
    amount: Decimal,
) -> Result<Counter, BankServiceError> {
    let limits = ledger
        .get_limits(user_id)
        .await?
        .ok_or(BankServiceError::NotFound)?;
    if amount > limits.channel(channel).single {
        return Err(BankServiceError::SingleLimitExceeded);
    }

    match ledger.try_reserve(user_id, channel, amount).await? {
        ReserveOutcome::Reserved(counter) => Ok(counter),
        ReserveOutcome::DailyExceeded => Err(BankServiceError::DailyLimitExceeded),
        ReserveOutcome::MissingRow => Err(BankServiceError::NotFound),
    }
}

// ── GetLimits ────────────────────────────────────────────────────────────────

pub struct GetLimitsUseCase<L: LedgerRepository> {
    pub ledger: L,
}

impl<L: LedgerRepository> GetLimitsUseCase<L> {
    pub async fn execute(&self, user_id: Uuid) -> Result<(Limits, Counter), BankServiceError> {
        let limits = self
            .ledger
            .get_limits(user_id)
            .await?
            .ok_or(BankServiceError::NotFound)?;
        let counter = self
            .ledger
            .get_counter(user_id)
            .await?
            .ok_or(BankServiceError::NotFound)?;
        Ok((limits, counter))
    }
}

// ── RequestLimitUpgrade ──────────────────────────────────────────────────────

pub struct RequestLimitUpgradeUseCase<R: UpgradeRequestRepository> {
    pub repo: R,
}

impl<R: UpgradeRequestRepository> RequestLimitUpgradeUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        channel: &str,
        single: Decimal,
        daily: Decimal,
    ) -> Result<UpgradeLimitRequest, BankServiceError> {
        let (errors, channel) = validate_limit_upgrade(&LimitUpgradeFields {
            channel,
            single,
            daily,
        });
        let Some(channel) = channel else {
            return Err(BankServiceError::Validation(errors));
        };
        if !errors.is_empty() {
            return Err(BankServiceError::Validation(errors));
        }

        let now = Utc::now();
        let request = UpgradeLimitRequest {
            id: Uuid::new_v4(),
            user_id,
            channel,
            single,
            daily,
            status: UpgradeStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&request).await?;
        Ok(request)
    }
}

// ── ApproveLimitUpgrade ──────────────────────────────────────────────────────

pub struct ApproveLimitUpgradeUseCase<R: UpgradeRequestRepository> {
    pub repo: R,
}

impl<R: UpgradeRequestRepository> ApproveLimitUpgradeUseCase<R> {
    pub async fn execute(&self, request_id: Uuid) -> Result<UpgradeLimitRequest, BankServiceError> {
        match self.repo.approve(request_id).await? {
            ApproveOutcome::Applied(request) => Ok(request),
            // Double-approval is an explicit no-op.
            ApproveOutcome::AlreadyCompleted(request) => Ok(request),
            ApproveOutcome::Cancelled => Err(BankServiceError::Conflict(
                "the request has already been cancelled".to_owned(),
            )),
            ApproveOutcome::NotFound => Err(BankServiceError::NotFound),
        }
    }
}

// ── CancelLimitUpgrade ───────────────────────────────────────────────────────

pub struct CancelLimitUpgradeUseCase<R: UpgradeRequestRepository> {
    pub repo: R,
}

impl<R: UpgradeRequestRepository> CancelLimitUpgradeUseCase<R> {
    pub async fn execute(&self, request_id: Uuid) -> Result<UpgradeLimitRequest, BankServiceError> {
        match self.repo.cancel(request_id).await? {
            CancelOutcome::Cancelled(request) => Ok(request),
            CancelOutcome::AlreadyCancelled(request) => Ok(request),
            CancelOutcome::Completed => Err(BankServiceError::Conflict(
                "the request has already been completed".to_owned(),
            )),
            CancelOutcome::NotFound => Err(BankServiceError::NotFound),
        }
    }
}
