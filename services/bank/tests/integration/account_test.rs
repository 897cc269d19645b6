use std::time::Duration;

use rust_decimal::Decimal;

use kolo_domain::nuban::{BANK_CODE, BRANCH_CODE, is_valid_account_number};

use kolo_bank::domain::repository::InsertDetailsOutcome;
use kolo_bank::error::BankServiceError;
use kolo_bank::usecase::account::{
    ChangePinUseCase, OpenAccountInput, OpenAccountUseCase, SetPinUseCase,
};
use kolo_bank::usecase::user::verify_secret;

use crate::helpers::{MockAccountRepo, test_details, test_user};

fn opening_input() -> OpenAccountInput {
    OpenAccountInput {
        surname: "Eze".into(),
        firstname: "Ada".into(),
        address: "12 Marina Rd".into(),
        city: "Lagos".into(),
        phone_number: "08012345678".into(),
        bvn: "22212345678".into(),
    }
}

// ── Opening accounts ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_open_account_with_a_structured_account_number() {
    let user = test_user();
    let usecase = OpenAccountUseCase {
        repo: MockAccountRepo::empty(),
        retry_backoff: Duration::ZERO,
    };

    let drafted = usecase.prepare(user.id, &opening_input()).await.unwrap();
    assert!(is_valid_account_number(&drafted.account_number));
    assert!(drafted.account_number.starts_with(BANK_CODE));
    assert_eq!(&drafted.account_number[3..6], BRANCH_CODE);

    let persisted = usecase.persist_with_retry(drafted).await.unwrap();
    let inserted = usecase.repo.inserted.lock().unwrap();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].account_number, persisted.account_number);
    assert!(inserted[0].transaction_pin.is_none());
}

#[tokio::test]
async fn should_issue_a_fresh_number_when_the_drafted_one_collides() {
    let user = test_user();
    let usecase = OpenAccountUseCase {
        repo: MockAccountRepo::scripted(vec![InsertDetailsOutcome::DuplicateAccountNumber]),
        retry_backoff: Duration::ZERO,
    };

    let drafted = usecase.prepare(user.id, &opening_input()).await.unwrap();
    let drafted_number = drafted.account_number.clone();
    let persisted = usecase.persist_with_retry(drafted).await.unwrap();

    assert_ne!(persisted.account_number, drafted_number);
    assert!(is_valid_account_number(&persisted.account_number));
}

#[tokio::test]
async fn should_refuse_a_second_account_for_the_same_user() {
    let user = test_user();
    let usecase = OpenAccountUseCase {
        repo: MockAccountRepo::empty(),
        retry_backoff: Duration::ZERO,
    };

    let drafted = usecase.prepare(user.id, &opening_input()).await.unwrap();
    usecase.persist_with_retry(drafted).await.unwrap();

    let result = usecase.prepare(user.id, &opening_input()).await;
    assert!(
        matches!(result, Err(BankServiceError::Conflict(_))),
        "expected conflict, got {result:?}"
    );
}

// ── PIN lifecycle ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_set_then_change_the_pin_through_a_shared_store() {
    let user = test_user();
    let repo = MockAccountRepo::empty();

    let open = OpenAccountUseCase {
        repo: repo.clone(),
        retry_backoff: Duration::ZERO,
    };
    let drafted = open.prepare(user.id, &opening_input()).await.unwrap();
    open.persist_with_retry(drafted).await.unwrap();

    SetPinUseCase { repo: repo.clone() }
        .execute(user.id, "1234")
        .await
        .unwrap();

    let change = ChangePinUseCase { repo: repo.clone() };
    let result = change.execute(user.id, "0000", "5678").await;
    assert!(matches!(result, Err(BankServiceError::InvalidTransferPin)));

    change.execute(user.id, "1234", "5678").await.unwrap();
    let stored = repo
        .details
        .lock()
        .unwrap()
        .clone()
        .unwrap()
        .transaction_pin
        .unwrap();
    assert!(verify_secret("5678", &stored).unwrap());
}

#[tokio::test]
async fn should_refuse_to_overwrite_an_existing_pin_via_set() {
    let user = test_user();
    let repo = MockAccountRepo::with_details(test_details(&user, "1234", Decimal::ZERO));

    let result = SetPinUseCase { repo }.execute(user.id, "5678").await;
    assert!(matches!(result, Err(BankServiceError::Conflict(_))));
}
