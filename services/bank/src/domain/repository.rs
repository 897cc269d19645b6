#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use kolo_domain::limits::{Channel, Counter, Limits};
use kolo_domain::pagination::PageRequest;

use crate::domain::types::{
    AccountDetails, AccountProfile, Token, Transaction, UpgradeLimitRequest, User,
};
use crate::error::BankServiceError;

/// Typed outcome of a user insert; unique-constraint hits name the field so
/// the caller can answer with the legacy "already in use" message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertUserOutcome {
    Created,
    DuplicateEmail,
    DuplicateUsername,
}

/// Repository for registered users.
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<InsertUserOutcome, BankServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, BankServiceError>;
}

/// Repository for stateful bearer tokens.
pub trait TokenRepository: Send + Sync {
    async fn insert(&self, token: &Token) -> Result<(), BankServiceError>;
    /// Resolve the owner of a token digest within a scope, together with the
    /// token's expiry. The expiry check belongs to the usecase.
    async fn find_user(
        &self,
        scope: &str,
        hash: &[u8],
    ) -> Result<Option<(User, DateTime<Utc>)>, BankServiceError>;
}

/// Typed outcome of an account-details insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertDetailsOutcome {
    Created,
    /// The generated account number collided with an existing one.
    DuplicateAccountNumber,
    /// The user already has an account-details row.
    DuplicateUser,
}

/// Repository for per-user account details (account number, PIN, blobs).
pub trait AccountRepository: Send + Sync {
    async fn create_details(
        &self,
        details: &AccountDetails,
    ) -> Result<InsertDetailsOutcome, BankServiceError>;
    async fn find_details(&self, user_id: Uuid)
    -> Result<Option<AccountDetails>, BankServiceError>;
    /// Returns `false` when the user has no account-details row.
    async fn set_pin(&self, user_id: Uuid, pin_hash: &str) -> Result<bool, BankServiceError>;
    async fn get_profile(&self, user_id: Uuid)
    -> Result<Option<AccountProfile>, BankServiceError>;
}

/// Typed outcome of an atomic counter reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// The counter was incremented; carries the updated counter.
    Reserved(Counter),
    /// The row exists but the increment would breach the daily ceiling.
    DailyExceeded,
    /// No account-details row for this user.
    MissingRow,
}

/// Repository for the limits/counter ledger.
pub trait LedgerRepository: Send + Sync {
    async fn get_limits(&self, user_id: Uuid) -> Result<Option<Limits>, BankServiceError>;
    /// Counter usage for the current UTC calendar day.
    async fn get_counter(&self, user_id: Uuid) -> Result<Option<Counter>, BankServiceError>;
    /// Atomic check-and-increment of one channel's counter against its daily
    /// ceiling. One statement per call; concurrent reservations can never
    /// both pass the check against a stale counter.
    async fn try_reserve(
        &self,
        user_id: Uuid,
        channel: Channel,
        amount: Decimal,
    ) -> Result<ReserveOutcome, BankServiceError>;
    /// Compensating decrement, floored at zero, same-day only.
    async fn release(
        &self,
        user_id: Uuid,
        channel: Channel,
        amount: Decimal,
    ) -> Result<(), BankServiceError>;
}

/// Typed outcome of approving a limit-upgrade request.
#[derive(Debug, Clone, PartialEq)]
pub enum ApproveOutcome {
    /// Status moved `pending` to `completed` and the live limits channel was
    /// overwritten, in one transaction.
    Applied(UpgradeLimitRequest),
    /// Already `completed`; approval is an idempotent no-op.
    AlreadyCompleted(UpgradeLimitRequest),
    /// Already `cancelled`; cannot be approved.
    Cancelled,
    NotFound,
}

/// Typed outcome of cancelling a limit-upgrade request.
#[derive(Debug, Clone, PartialEq)]
pub enum CancelOutcome {
    Cancelled(UpgradeLimitRequest),
    /// Already `cancelled`; idempotent no-op.
    AlreadyCancelled(UpgradeLimitRequest),
    /// Already `completed`; cannot be cancelled.
    Completed,
    NotFound,
}

/// Repository for limit-upgrade requests.
pub trait UpgradeRequestRepository: Send + Sync {
    async fn create(&self, request: &UpgradeLimitRequest) -> Result<(), BankServiceError>;
    async fn approve(&self, request_id: Uuid) -> Result<ApproveOutcome, BankServiceError>;
    async fn cancel(&self, request_id: Uuid) -> Result<CancelOutcome, BankServiceError>;
}

/// Repository for the transaction history.
pub trait TransactionRepository: Send + Sync {
    async fn insert(&self, transaction: &Transaction) -> Result<(), BankServiceError>;
    async fn list_by_account(
        &self,
        account_number: &str,
        page: PageRequest,
    ) -> Result<Vec<Transaction>, BankServiceError>;
}

/// Outbound transfer request to the payment gateway.
#[derive(Debug, Clone)]
pub struct GatewayTransfer {
    pub from_account_number: String,
    pub to_account_number: String,
    pub amount: Decimal,
    pub description: String,
}

/// Settled transfer as reported by the gateway.
#[derive(Debug, Clone)]
pub struct GatewaySettlement {
    pub external_reference: String,
}

/// Port for the upstream payment gateway.
pub trait PaymentGateway: Send + Sync {
    /// Execute a transfer. Errors surface as `GatewayFailure` with the cause
    /// preserved for logging.
    async fn transfer(
        &self,
        request: &GatewayTransfer,
    ) -> Result<GatewaySettlement, BankServiceError>;
}
