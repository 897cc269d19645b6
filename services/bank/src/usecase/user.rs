use argon2::password_hash::{PasswordHash, SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{InsertUserOutcome, UserRepository};
use crate::domain::types::{FieldErrors, RegistrationFields, User, validate_registration};
use crate::error::BankServiceError;

/// Argon2 hash of a password or transaction PIN, PHC string format.
pub fn hash_secret(secret: &str) -> Result<String, BankServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("hash secret: {e}").into())
}

pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, BankServiceError> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("parse secret hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok())
}

// ── RegisterUser ─────────────────────────────────────────────────────────────

pub struct RegisterUserInput {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub device_id: String,
    pub device_os: String,
    pub device_name: String,
}

pub struct RegisterUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> RegisterUserUseCase<R> {
    pub async fn execute(&self, input: RegisterUserInput) -> Result<User, BankServiceError> {
        let errors = validate_registration(&RegistrationFields {
            name: &input.name,
            username: &input.username,
            email: &input.email,
            password: &input.password,
            device_id: &input.device_id,
            device_os: &input.device_os,
            device_name: &input.device_name,
        });
        if !errors.is_empty() {
            return Err(BankServiceError::Validation(errors));
        }

        let password_hash = hash_secret(&input.password)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: input.name,
            username: input.username,
            email: input.email,
            password_hash,
            phone_number: None,
            activated: false,
            kyc_level: 0,
            device_id: input.device_id,
            device_os: input.device_os,
            device_name: input.device_name,
            source: "mobile".to_owned(),
            created_at: now,
            updated_at: now,
        };

        match self.repo.create(&user).await? {
            InsertUserOutcome::Created => Ok(user),
            InsertUserOutcome::DuplicateEmail => {
                let mut errors = FieldErrors::new();
                errors.insert(
                    "email".to_owned(),
                    "a user with this email address already exists".to_owned(),
                );
                Err(BankServiceError::Validation(errors))
            }
            InsertUserOutcome::DuplicateUsername => {
                let mut errors = FieldErrors::new();
                errors.insert(
                    "username".to_owned(),
                    "a user with this username already exists".to_owned(),
                );
                Err(BankServiceError::Validation(errors))
            }
        }
    }
}
