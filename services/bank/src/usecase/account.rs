use chrono::Utc;
use uuid::Uuid;

use kolo_domain::limits::{Counter, Limits};
use kolo_domain::nuban::NubanGenerator;

use crate::domain::repository::{AccountRepository, InsertDetailsOutcome};
use crate::domain::types::{
    AccountDetails, AccountOpeningFields, AccountProfile, is_valid_pin, validate_account_opening,
};
use crate::error::BankServiceError;
use crate::usecase::user::{hash_secret, verify_secret};

/// How many fresh account numbers to try when an insert collides.
const MAX_NUBAN_GENERATIONS: u32 = 5;
/// How many times a transient store failure is retried before the row is
/// dead-lettered to the log.
const MAX_TRANSIENT_RETRIES: u32 = 3;

// ── OpenAccount ──────────────────────────────────────────────────────────────

pub struct OpenAccountInput {
    pub surname: String,
    pub firstname: String,
    pub address: String,
    pub city: String,
    pub phone_number: String,
    pub bvn: String,
}

pub struct OpenAccountUseCase<A: AccountRepository> {
    pub repo: A,
    /// Base delay between transient-failure retries; doubles per attempt.
    /// Tests set this to zero.
    pub retry_backoff: std::time::Duration,
}

impl<A: AccountRepository> OpenAccountUseCase<A> {
    /// Validate the KYC payload and draft the account-details row. The
    /// caller responds with the drafted account number immediately and
    /// persists via [`Self::persist_with_retry`] in a background task.
    pub async fn prepare(
        &self,
        user_id: Uuid,
        input: &OpenAccountInput,
    ) -> Result<AccountDetails, BankServiceError> {
        let errors = validate_account_opening(&AccountOpeningFields {
            surname: &input.surname,
            firstname: &input.firstname,
            address: &input.address,
            city: &input.city,
            phone_number: &input.phone_number,
            bvn: &input.bvn,
        });
        if !errors.is_empty() {
            return Err(BankServiceError::Validation(errors));
        }
        if self.repo.find_details(user_id).await?.is_some() {
            return Err(BankServiceError::Conflict(
                "an account already exists for this user".to_owned(),
            ));
        }

        let now = Utc::now();
        Ok(AccountDetails {
            user_id,
            account_number: NubanGenerator::new().generate(),
            transaction_pin: None,
            limits: Limits::default(),
            counter: Counter::zero(),
            counter_date: now.date_naive(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Persist the drafted row. Collisions on the account number get a fresh
    /// number (bounded); transient store failures back off exponentially. The
    /// final error is returned for the caller to dead-letter.
    pub async fn persist_with_retry(
        &self,
        mut details: AccountDetails,
    ) -> Result<AccountDetails, BankServiceError> {
        let generator = NubanGenerator::new();
        let mut generations = 1;
        let mut transient_failures = 0;

        loop {
            match self.repo.create_details(&details).await {
                Ok(InsertDetailsOutcome::Created) => return Ok(details),
                Ok(InsertDetailsOutcome::DuplicateAccountNumber) => {
                    if generations >= MAX_NUBAN_GENERATIONS {
                        return Err(BankServiceError::Conflict(
                            "could not issue a unique account number".to_owned(),
                        ));
                    }
                    generations += 1;
                    let fresh = generator.generate();
                    tracing::warn!(
                        user_id = %details.user_id,
                        generations,
                        "account number collision, retrying with a fresh number"
                    );
                    details.account_number = fresh;
                }
                Ok(InsertDetailsOutcome::DuplicateUser) => {
                    return Err(BankServiceError::Conflict(
                        "an account already exists for this user".to_owned(),
                    ));
                }
                Err(e) => {
                    if transient_failures >= MAX_TRANSIENT_RETRIES {
                        return Err(e);
                    }
                    transient_failures += 1;
                    let delay = self.retry_backoff * 2u32.pow(transient_failures - 1);
                    tracing::warn!(
                        user_id = %details.user_id,
                        attempt = transient_failures,
                        error = %e,
                        "account persistence failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

// ── SetPin / ChangePin ───────────────────────────────────────────────────────

pub struct SetPinUseCase<A: AccountRepository> {
    pub repo: A,
}

impl<A: AccountRepository> SetPinUseCase<A> {
    pub async fn execute(&self, user_id: Uuid, pin: &str) -> Result<(), BankServiceError> {
        validate_pin_shape(pin)?;
        let details = self
            .repo
            .find_details(user_id)
            .await?
            .ok_or(BankServiceError::NotFound)?;
        if details.transaction_pin.is_some() {
            return Err(BankServiceError::Conflict(
                "a transaction PIN has already been set".to_owned(),
            ));
        }
        let hash = hash_secret(pin)?;
        if !self.repo.set_pin(user_id, &hash).await? {
            return Err(BankServiceError::NotFound);
        }
        Ok(())
    }
}

pub struct ChangePinUseCase<A: AccountRepository> {
    pub repo: A,
}

impl<A: AccountRepository> ChangePinUseCase<A> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        old_pin: &str,
        new_pin: &str,
    ) -> Result<(), BankServiceError> {
        validate_pin_shape(new_pin)?;
        let details = self
            .repo
            .find_details(user_id)
            .await?
            .ok_or(BankServiceError::NotFound)?;
        let Some(current_hash) = &details.transaction_pin else {
            return Err(BankServiceError::TransactionPinNotSet);
        };
        if !verify_secret(old_pin, current_hash)? {
            return Err(BankServiceError::InvalidTransferPin);
        }
        let hash = hash_secret(new_pin)?;
        if !self.repo.set_pin(user_id, &hash).await? {
            return Err(BankServiceError::NotFound);
        }
        Ok(())
    }
}

fn validate_pin_shape(pin: &str) -> Result<(), BankServiceError> {
    if is_valid_pin(pin) {
        return Ok(());
    }
    let mut errors = crate::domain::types::FieldErrors::new();
    errors.insert("pin".to_owned(), "must be exactly 4 digits".to_owned());
    Err(BankServiceError::Validation(errors))
}

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<A: AccountRepository> {
    pub repo: A,
}

impl<A: AccountRepository> GetProfileUseCase<A> {
    pub async fn execute(&self, user_id: Uuid) -> Result<AccountProfile, BankServiceError> {
        self.repo
            .get_profile(user_id)
            .await?
            .ok_or(BankServiceError::NotFound)
    }
}
