use rust_decimal::Decimal;
use uuid::Uuid;

use kolo_domain::limits::{Channel, Counter, Limits};

use kolo_bank::domain::types::UpgradeStatus;
use kolo_bank::error::BankServiceError;
use kolo_bank::usecase::limit::{
    ApproveLimitUpgradeUseCase, CancelLimitUpgradeUseCase, GetLimitsUseCase,
    RequestLimitUpgradeUseCase,
};

use crate::helpers::{MockLedger, MockUpgradeRepo};

// ── Upgrade request lifecycle ────────────────────────────────────────────────

#[tokio::test]
async fn should_apply_limits_when_a_pending_request_is_approved() {
    let repo = MockUpgradeRepo::default();
    let request = RequestLimitUpgradeUseCase { repo: repo.clone() }
        .execute(
            Uuid::new_v4(),
            "transfers",
            Decimal::from(500_000),
            Decimal::from(2_000_000),
        )
        .await
        .unwrap();
    assert_eq!(request.status, UpgradeStatus::Pending);

    let approved = ApproveLimitUpgradeUseCase { repo: repo.clone() }
        .execute(request.id)
        .await
        .unwrap();
    assert_eq!(approved.status, UpgradeStatus::Completed);
    assert_eq!(repo.requests.lock().unwrap()[0], approved);

    let applied = repo.applied.lock().unwrap();
    assert_eq!(
        applied.as_slice(),
        &[(
            Channel::Transfers,
            Decimal::from(500_000),
            Decimal::from(2_000_000)
        )]
    );
}

#[tokio::test]
async fn should_apply_limits_only_once_on_repeated_approvals() {
    let repo = MockUpgradeRepo::default();
    let request = RequestLimitUpgradeUseCase { repo: repo.clone() }
        .execute(
            Uuid::new_v4(),
            "bills",
            Decimal::from(300_000),
            Decimal::from(900_000),
        )
        .await
        .unwrap();

    let approve = ApproveLimitUpgradeUseCase { repo: repo.clone() };
    approve.execute(request.id).await.unwrap();
    let second = approve.execute(request.id).await.unwrap();

    assert_eq!(second.status, UpgradeStatus::Completed);
    assert_eq!(repo.applied.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_not_approve_a_cancelled_request() {
    let repo = MockUpgradeRepo::default();
    let request = RequestLimitUpgradeUseCase { repo: repo.clone() }
        .execute(
            Uuid::new_v4(),
            "transfers",
            Decimal::from(500_000),
            Decimal::from(2_000_000),
        )
        .await
        .unwrap();

    let cancelled = CancelLimitUpgradeUseCase { repo: repo.clone() }
        .execute(request.id)
        .await
        .unwrap();
    assert_eq!(cancelled.status, UpgradeStatus::Cancelled);

    let result = ApproveLimitUpgradeUseCase { repo: repo.clone() }
        .execute(request.id)
        .await;
    assert!(
        matches!(result, Err(BankServiceError::Conflict(_))),
        "expected conflict, got {result:?}"
    );
    assert!(repo.applied.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_not_cancel_a_completed_request() {
    let repo = MockUpgradeRepo::default();
    let request = RequestLimitUpgradeUseCase { repo: repo.clone() }
        .execute(
            Uuid::new_v4(),
            "ussd",
            Decimal::from(50_000),
            Decimal::from(100_000),
        )
        .await
        .unwrap();

    ApproveLimitUpgradeUseCase { repo: repo.clone() }
        .execute(request.id)
        .await
        .unwrap();

    let result = CancelLimitUpgradeUseCase { repo: repo.clone() }
        .execute(request.id)
        .await;
    assert!(matches!(result, Err(BankServiceError::Conflict(_))));
}

#[tokio::test]
async fn should_report_not_found_for_an_unknown_request() {
    let repo = MockUpgradeRepo::default();
    let result = ApproveLimitUpgradeUseCase { repo }.execute(Uuid::new_v4()).await;
    assert!(matches!(result, Err(BankServiceError::NotFound)));
}

// ── Reading limits ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_read_limits_together_with_todays_counter() {
    let ledger = MockLedger::with_transfers_counter(Decimal::from(125_000));
    let usecase = GetLimitsUseCase { ledger };

    let (limits, counter) = usecase.execute(Uuid::new_v4()).await.unwrap();
    assert_eq!(limits, Limits::default());
    assert_eq!(
        counter,
        Counter {
            transfers: Decimal::from(125_000),
            bills: Decimal::ZERO,
            ussd: Decimal::ZERO,
        }
    );
}
