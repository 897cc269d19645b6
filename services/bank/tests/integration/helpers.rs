use std::sync::{Arc, Mutex};

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use kolo_domain::limits::{Channel, Counter, Limits};
use kolo_domain::pagination::{PAGE_SIZE, PageRequest};

use kolo_bank::domain::repository::{
    AccountRepository, ApproveOutcome, CancelOutcome, GatewaySettlement, GatewayTransfer,
    InsertDetailsOutcome, LedgerRepository, PaymentGateway, ReserveOutcome, TransactionRepository,
    UpgradeRequestRepository,
};
use kolo_bank::domain::types::{
    AccountDetails, AccountProfile, Transaction, UpgradeLimitRequest, UpgradeStatus, User,
};
use kolo_bank::error::BankServiceError;
use kolo_bank::usecase::user::hash_secret;

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user() -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        name: "Ada Eze".into(),
        username: "ada".into(),
        email: "ada@example.com".into(),
        password_hash: "unused".into(),
        phone_number: Some("08012345678".into()),
        activated: true,
        kyc_level: 1,
        device_id: "d-1".into(),
        device_os: "android".into(),
        device_name: "pixel".into(),
        source: "mobile".into(),
        created_at: now,
        updated_at: now,
    }
}

pub fn test_details(user: &User, pin: &str, transfers_counter: Decimal) -> AccountDetails {
    let now = Utc::now();
    AccountDetails {
        user_id: user.id,
        account_number: "0900011111".into(),
        transaction_pin: Some(hash_secret(pin).unwrap()),
        limits: Limits::default(),
        counter: Counter {
            transfers: transfers_counter,
            bills: Decimal::ZERO,
            ussd: Decimal::ZERO,
        },
        counter_date: now.date_naive(),
        created_at: now,
        updated_at: now,
    }
}

// ── MockAccountRepo ──────────────────────────────────────────────────────────

/// Account-details store. Clones share the same state, so one instance can
/// back several usecases in a flow.
#[derive(Clone, Default)]
pub struct MockAccountRepo {
    pub details: Arc<Mutex<Option<AccountDetails>>>,
    /// Outcomes returned by successive `create_details` calls; once the
    /// script runs dry every insert succeeds.
    pub insert_script: Arc<Mutex<Vec<InsertDetailsOutcome>>>,
    pub inserted: Arc<Mutex<Vec<AccountDetails>>>,
}

impl MockAccountRepo {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_details(details: AccountDetails) -> Self {
        let repo = Self::default();
        *repo.details.lock().unwrap() = Some(details);
        repo
    }

    pub fn scripted(outcomes: Vec<InsertDetailsOutcome>) -> Self {
        let repo = Self::default();
        *repo.insert_script.lock().unwrap() = outcomes;
        repo
    }
}

impl AccountRepository for MockAccountRepo {
    async fn create_details(
        &self,
        details: &AccountDetails,
    ) -> Result<InsertDetailsOutcome, BankServiceError> {
        let mut script = self.insert_script.lock().unwrap();
        let outcome = if script.is_empty() {
            if self.details.lock().unwrap().is_some() {
                InsertDetailsOutcome::DuplicateUser
            } else {
                InsertDetailsOutcome::Created
            }
        } else {
            script.remove(0)
        };
        if outcome == InsertDetailsOutcome::Created {
            *self.details.lock().unwrap() = Some(details.clone());
            self.inserted.lock().unwrap().push(details.clone());
        }
        Ok(outcome)
    }

    async fn find_details(
        &self,
        _user_id: Uuid,
    ) -> Result<Option<AccountDetails>, BankServiceError> {
        Ok(self.details.lock().unwrap().clone())
    }

    async fn set_pin(&self, _user_id: Uuid, pin_hash: &str) -> Result<bool, BankServiceError> {
        let mut details = self.details.lock().unwrap();
        match details.as_mut() {
            Some(details) => {
                details.transaction_pin = Some(pin_hash.to_owned());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_profile(
        &self,
        _user_id: Uuid,
    ) -> Result<Option<AccountProfile>, BankServiceError> {
        Ok(None)
    }
}

// ── MockLedger ───────────────────────────────────────────────────────────────

/// In-memory ledger with the store's compare-and-increment contract: the
/// daily check and the increment happen under one lock, so concurrent
/// reservations serialize exactly like the atomic UPDATE does.
#[derive(Clone)]
pub struct MockLedger {
    pub limits: Limits,
    pub counter: Arc<Mutex<Counter>>,
}

impl MockLedger {
    pub fn with_transfers_counter(transfers: Decimal) -> Self {
        Self {
            limits: Limits::default(),
            counter: Arc::new(Mutex::new(Counter {
                transfers,
                bills: Decimal::ZERO,
                ussd: Decimal::ZERO,
            })),
        }
    }

    pub fn transfers_counter(&self) -> Decimal {
        self.counter.lock().unwrap().transfers
    }
}

impl LedgerRepository for MockLedger {
    async fn get_limits(&self, _user_id: Uuid) -> Result<Option<Limits>, BankServiceError> {
        Ok(Some(self.limits))
    }

    async fn get_counter(&self, _user_id: Uuid) -> Result<Option<Counter>, BankServiceError> {
        Ok(Some(*self.counter.lock().unwrap()))
    }

    async fn try_reserve(
        &self,
        _user_id: Uuid,
        channel: Channel,
        amount: Decimal,
    ) -> Result<ReserveOutcome, BankServiceError> {
        let mut counter = self.counter.lock().unwrap();
        if counter.channel(channel) + amount > self.limits.channel(channel).daily {
            return Ok(ReserveOutcome::DailyExceeded);
        }
        match channel {
            Channel::Transfers => counter.transfers += amount,
            Channel::Bills => counter.bills += amount,
            Channel::Ussd => counter.ussd += amount,
        }
        Ok(ReserveOutcome::Reserved(*counter))
    }

    async fn release(
        &self,
        _user_id: Uuid,
        channel: Channel,
        amount: Decimal,
    ) -> Result<(), BankServiceError> {
        let mut counter = self.counter.lock().unwrap();
        let floored = (counter.channel(channel) - amount).max(Decimal::ZERO);
        match channel {
            Channel::Transfers => counter.transfers = floored,
            Channel::Bills => counter.bills = floored,
            Channel::Ussd => counter.ussd = floored,
        }
        Ok(())
    }
}

// ── MockTransactionRepo ──────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockTransactionRepo {
    pub rows: Arc<Mutex<Vec<Transaction>>>,
}

impl TransactionRepository for MockTransactionRepo {
    async fn insert(&self, transaction: &Transaction) -> Result<(), BankServiceError> {
        self.rows.lock().unwrap().push(transaction.clone());
        Ok(())
    }

    async fn list_by_account(
        &self,
        account_number: &str,
        page: PageRequest,
    ) -> Result<Vec<Transaction>, BankServiceError> {
        let page = page.clamped();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.account_number == account_number)
            .skip(page.offset() as usize)
            .take(PAGE_SIZE as usize)
            .cloned()
            .collect())
    }
}

// ── MockGateway ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockGateway {
    pub succeed: bool,
    pub calls: Arc<Mutex<u32>>,
}

impl MockGateway {
    pub fn settling() -> Self {
        Self {
            succeed: true,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            succeed: false,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

impl PaymentGateway for MockGateway {
    async fn transfer(
        &self,
        _request: &GatewayTransfer,
    ) -> Result<GatewaySettlement, BankServiceError> {
        *self.calls.lock().unwrap() += 1;
        if self.succeed {
            Ok(GatewaySettlement {
                external_reference: "EXT-001".into(),
            })
        } else {
            Err(BankServiceError::GatewayFailure("connection refused".into()))
        }
    }
}

// ── MockUpgradeRepo ──────────────────────────────────────────────────────────

/// In-memory upgrade-request store with the real status transition rules,
/// including the idempotent double-approve.
#[derive(Clone, Default)]
pub struct MockUpgradeRepo {
    pub requests: Arc<Mutex<Vec<UpgradeLimitRequest>>>,
    /// `(channel, single, daily)` triples applied by approvals, for
    /// post-execution inspection.
    pub applied: Arc<Mutex<Vec<(Channel, Decimal, Decimal)>>>,
}

impl UpgradeRequestRepository for MockUpgradeRepo {
    async fn create(&self, request: &UpgradeLimitRequest) -> Result<(), BankServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn approve(&self, request_id: Uuid) -> Result<ApproveOutcome, BankServiceError> {
        let mut requests = self.requests.lock().unwrap();
        let Some(request) = requests.iter_mut().find(|r| r.id == request_id) else {
            return Ok(ApproveOutcome::NotFound);
        };
        match request.status {
            UpgradeStatus::Completed => Ok(ApproveOutcome::AlreadyCompleted(request.clone())),
            UpgradeStatus::Cancelled => Ok(ApproveOutcome::Cancelled),
            UpgradeStatus::Pending => {
                request.status = UpgradeStatus::Completed;
                request.updated_at = Utc::now();
                self.applied.lock().unwrap().push((
                    request.channel,
                    request.single,
                    request.daily,
                ));
                Ok(ApproveOutcome::Applied(request.clone()))
            }
        }
    }

    async fn cancel(&self, request_id: Uuid) -> Result<CancelOutcome, BankServiceError> {
        let mut requests = self.requests.lock().unwrap();
        let Some(request) = requests.iter_mut().find(|r| r.id == request_id) else {
            return Ok(CancelOutcome::NotFound);
        };
        match request.status {
            UpgradeStatus::Cancelled => Ok(CancelOutcome::AlreadyCancelled(request.clone())),
            UpgradeStatus::Completed => Ok(CancelOutcome::Completed),
            UpgradeStatus::Pending => {
                request.status = UpgradeStatus::Cancelled;
                request.updated_at = Utc::now();
                Ok(CancelOutcome::Cancelled(request.clone()))
            }
        }
    }
}
