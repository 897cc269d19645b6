use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use kolo_domain::limits::{Channel, Counter, Limits};

use crate::error::BankServiceError;

pub const SCOPE_AUTHENTICATION: &str = "authentication";

// ── Users and callers ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub activated: bool,
    pub kyc_level: i16,
    pub device_id: String,
    pub device_os: String,
    pub device_name: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The identity behind a request. Routes that require authentication call
/// [`Caller::require_user`]; there is no sentinel user value anywhere.
#[derive(Debug, Clone)]
pub enum Caller {
    Anonymous,
    User(User),
}

impl Caller {
    pub fn require_user(&self) -> Result<&User, BankServiceError> {
        match self {
            Self::User(user) => Ok(user),
            Self::Anonymous => Err(BankServiceError::InvalidToken),
        }
    }
}

/// Stored token record. Only the SHA-256 digest of the plaintext persists.
#[derive(Debug, Clone)]
pub struct Token {
    pub hash: Vec<u8>,
    pub user_id: Uuid,
    pub scope: String,
    pub expiry: DateTime<Utc>,
}

// ── Account details ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AccountDetails {
    pub user_id: Uuid,
    pub account_number: String,
    /// Argon2 hash of the 4-digit transaction PIN; `None` until the user
    /// sets one.
    pub transaction_pin: Option<String>,
    pub limits: Limits,
    pub counter: Counter,
    /// Calendar day (UTC) the counter belongs to. A stale date reads as
    /// an all-zero counter.
    pub counter_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountDetails {
    /// Counter usage for today; resets implicitly at the UTC day boundary.
    pub fn counter_today(&self, today: NaiveDate) -> Counter {
        if self.counter_date < today {
            Counter::zero()
        } else {
            self.counter
        }
    }
}

/// Read-side projection for `GET /v1/accounts/profile`.
#[derive(Debug, Clone)]
pub struct AccountProfile {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub kyc_level: i16,
    pub account_number: String,
}

// ── Transactions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Debit,
    Credit,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "debit" => Some(Self::Debit),
            "credit" => Some(Self::Credit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// One row per transfer attempt; never mutated once the terminal status is
/// written.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub transaction_type: TransactionType,
    pub source: Channel,
    pub narration: String,
    pub account_number: String,
    pub request_id: String,
    pub internal_reference: String,
    pub external_reference: Option<String>,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub commission: Option<Decimal>,
    pub balance_after: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Limit upgrade requests ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeStatus {
    Pending,
    Completed,
    Cancelled,
}

impl UpgradeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeLimitRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub channel: Channel,
    pub single: Decimal,
    pub daily: Decimal,
    pub status: UpgradeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Field validation ─────────────────────────────────────────────────────────
//
// Validators collect field errors into a map; an empty map means the payload
// passed. The map lands verbatim in the `error` field of the envelope.

pub type FieldErrors = BTreeMap<String, String>;

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

pub fn is_valid_pin(pin: &str) -> bool {
    pin.len() == 4 && pin.chars().all(|c| c.is_ascii_digit())
}

fn is_valid_msisdn(value: &str) -> bool {
    value.len() == 11 && value.chars().all(|c| c.is_ascii_digit())
}

fn require(errors: &mut FieldErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.insert(field.to_owned(), "must be provided".to_owned());
        false
    } else {
        true
    }
}

pub struct RegistrationFields<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub device_id: &'a str,
    pub device_os: &'a str,
    pub device_name: &'a str,
}

pub fn validate_registration(fields: &RegistrationFields<'_>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require(&mut errors, "name", fields.name);
    require(&mut errors, "username", fields.username);
    if require(&mut errors, "email", fields.email) && !is_valid_email(fields.email) {
        errors.insert("email".to_owned(), "must be a valid email address".to_owned());
    }
    if require(&mut errors, "password", fields.password) {
        let len = fields.password.len();
        if !(8..=72).contains(&len) {
            errors.insert(
                "password".to_owned(),
                "must be between 8 and 72 bytes long".to_owned(),
            );
        }
    }
    require(&mut errors, "device_id", fields.device_id);
    require(&mut errors, "device_os", fields.device_os);
    require(&mut errors, "device_name", fields.device_name);
    errors
}

pub struct AccountOpeningFields<'a> {
    pub surname: &'a str,
    pub firstname: &'a str,
    pub address: &'a str,
    pub city: &'a str,
    pub phone_number: &'a str,
    pub bvn: &'a str,
}

pub fn validate_account_opening(fields: &AccountOpeningFields<'_>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require(&mut errors, "surname", fields.surname);
    require(&mut errors, "firstname", fields.firstname);
    require(&mut errors, "address", fields.address);
    require(&mut errors, "city", fields.city);
    if require(&mut errors, "phone_number", fields.phone_number)
        && !is_valid_msisdn(fields.phone_number)
    {
        errors.insert(
            "phone_number".to_owned(),
            "must be exactly 11 digits".to_owned(),
        );
    }
    if require(&mut errors, "bvn", fields.bvn) && !is_valid_msisdn(fields.bvn) {
        errors.insert("bvn".to_owned(), "must be exactly 11 digits".to_owned());
    }
    errors
}

pub struct TransferFields<'a> {
    pub senders_account_no: &'a str,
    pub receiver_account_no: &'a str,
    pub amount: &'a str,
    pub narration: &'a str,
    pub pin: &'a str,
}

pub fn validate_transfer(fields: &TransferFields<'_>) -> (FieldErrors, Option<Decimal>) {
    let mut errors = FieldErrors::new();
    require(&mut errors, "senders_account_no", fields.senders_account_no);
    require(&mut errors, "receiver_account_no", fields.receiver_account_no);
    require(&mut errors, "narration", fields.narration);
    if require(&mut errors, "pin", fields.pin) && !is_valid_pin(fields.pin) {
        errors.insert("pin".to_owned(), "must be exactly 4 digits".to_owned());
    }

    let mut amount = None;
    if require(&mut errors, "amount", fields.amount) {
        match fields.amount.parse::<Decimal>() {
            Ok(value) if value > Decimal::ZERO => amount = Some(value),
            _ => {
                errors.insert(
                    "amount".to_owned(),
                    "must be a positive decimal amount".to_owned(),
                );
            }
        }
    }
    (errors, amount)
}

pub struct LimitUpgradeFields<'a> {
    pub channel: &'a str,
    pub single: Decimal,
    pub daily: Decimal,
}

pub fn validate_limit_upgrade(fields: &LimitUpgradeFields<'_>) -> (FieldErrors, Option<Channel>) {
    let mut errors = FieldErrors::new();
    let channel = Channel::from_name(fields.channel);
    if channel.is_none() {
        errors.insert(
            "channel".to_owned(),
            "must be one of: transfers, bills, ussd".to_owned(),
        );
    }
    if fields.single <= Decimal::ZERO {
        errors.insert("single".to_owned(), "must be a positive amount".to_owned());
    }
    if fields.daily < fields.single {
        errors.insert(
            "daily".to_owned(),
            "must be greater than or equal to the single limit".to_owned(),
        );
    }
    (errors, channel)
}
