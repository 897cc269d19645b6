use std::sync::Arc;

use rust_decimal::Decimal;

use kolo_domain::pagination::PageRequest;

use kolo_bank::error::BankServiceError;
use kolo_bank::usecase::history::GetHistoryUseCase;
use kolo_bank::usecase::transfer::{TransferInput, TransferUseCase};

use crate::helpers::{
    MockAccountRepo, MockGateway, MockLedger, MockTransactionRepo, test_details, test_user,
};

fn transfer_input(amount: &str) -> TransferInput {
    TransferInput {
        senders_account_no: "0900011111".into(),
        receiver_account_no: "0900022222".into(),
        amount: amount.into(),
        narration: "rent".into(),
        pin: "1234".into(),
    }
}

// ── Sequential flows ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_deplete_daily_headroom_across_successive_transfers() {
    let user = test_user();
    let usecase = TransferUseCase {
        accounts: MockAccountRepo::with_details(test_details(&user, "1234", Decimal::ZERO)),
        ledger: MockLedger::with_transfers_counter(Decimal::ZERO),
        transactions: MockTransactionRepo::default(),
        gateway: MockGateway::settling(),
    };

    // Default limits: single 200000, daily 600000. Three maximal transfers
    // land exactly on the daily ceiling.
    for i in 0..3 {
        let receipt = usecase
            .execute(&user, &format!("req-{i}"), transfer_input("200000"))
            .await
            .unwrap();
        assert_eq!(
            receipt.counter.transfers,
            Decimal::from(200_000) * Decimal::from(i + 1)
        );
    }

    let result = usecase
        .execute(&user, "req-3", transfer_input("1"))
        .await;
    assert!(
        matches!(result, Err(BankServiceError::DailyLimitExceeded)),
        "expected daily ceiling breach, got {result:?}"
    );
    assert_eq!(usecase.ledger.transfers_counter(), Decimal::from(600_000));
    assert_eq!(usecase.gateway.call_count(), 3);
    assert_eq!(usecase.transactions.rows.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn should_keep_headroom_after_repeated_gateway_failures() {
    let user = test_user();
    let usecase = TransferUseCase {
        accounts: MockAccountRepo::with_details(test_details(&user, "1234", Decimal::ZERO)),
        ledger: MockLedger::with_transfers_counter(Decimal::ZERO),
        transactions: MockTransactionRepo::default(),
        gateway: MockGateway::failing(),
    };

    for i in 0..2 {
        let result = usecase
            .execute(&user, &format!("req-{i}"), transfer_input("50000"))
            .await;
        assert!(matches!(result, Err(BankServiceError::GatewayFailure(_))));
    }

    // Every reservation was rolled back, so the full daily headroom remains.
    assert_eq!(usecase.ledger.transfers_counter(), Decimal::ZERO);
    let rows = usecase.transactions.rows.lock().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.external_reference.is_none()));
}

#[tokio::test]
async fn should_reject_transfer_without_account_details() {
    let user = test_user();
    let usecase = TransferUseCase {
        accounts: MockAccountRepo::empty(),
        ledger: MockLedger::with_transfers_counter(Decimal::ZERO),
        transactions: MockTransactionRepo::default(),
        gateway: MockGateway::settling(),
    };

    let result = usecase.execute(&user, "req-1", transfer_input("1000")).await;
    assert!(matches!(result, Err(BankServiceError::NotFound)));
    assert_eq!(usecase.gateway.call_count(), 0);
}

// ── Concurrency ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_serialize_concurrent_transfers_against_the_daily_ceiling() {
    // Ten concurrent transfers of 150000 against a daily ceiling of 600000:
    // exactly four can reserve, no matter how the tasks interleave.
    let user = test_user();
    let usecase = Arc::new(TransferUseCase {
        accounts: MockAccountRepo::with_details(test_details(&user, "1234", Decimal::ZERO)),
        ledger: MockLedger::with_transfers_counter(Decimal::ZERO),
        transactions: MockTransactionRepo::default(),
        gateway: MockGateway::settling(),
    });

    let mut handles = Vec::new();
    for i in 0..10 {
        let usecase = Arc::clone(&usecase);
        let user = user.clone();
        handles.push(tokio::spawn(async move {
            usecase
                .execute(&user, &format!("req-{i}"), transfer_input("150000"))
                .await
        }));
    }

    let mut settled = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => settled += 1,
            Err(BankServiceError::DailyLimitExceeded) => rejected += 1,
            Err(other) => panic!("unexpected transfer error: {other:?}"),
        }
    }

    assert_eq!(settled, 4);
    assert_eq!(rejected, 6);
    assert_eq!(usecase.ledger.transfers_counter(), Decimal::from(600_000));
    assert_eq!(usecase.gateway.call_count(), 4);
    assert_eq!(usecase.transactions.rows.lock().unwrap().len(), 4);
}

// ── Transfer then history ────────────────────────────────────────────────────

#[tokio::test]
async fn should_surface_settled_transfers_in_history() {
    let user = test_user();
    let accounts = MockAccountRepo::with_details(test_details(&user, "1234", Decimal::ZERO));
    let transactions = MockTransactionRepo::default();

    let transfer = TransferUseCase {
        accounts: accounts.clone(),
        ledger: MockLedger::with_transfers_counter(Decimal::ZERO),
        transactions: transactions.clone(),
        gateway: MockGateway::settling(),
    };
    for i in 0..3 {
        transfer
            .execute(&user, &format!("req-{i}"), transfer_input("10000"))
            .await
            .unwrap();
    }

    let history = GetHistoryUseCase {
        accounts,
        transactions,
    };
    let page = history
        .execute(&user, "0900011111", PageRequest { page: 1 })
        .await
        .unwrap();
    assert_eq!(page.len(), 3);
    assert!(page.iter().all(|t| t.external_reference.is_some()));
    assert!(page.iter().all(|t| t.amount == Decimal::from(10_000)));
}
