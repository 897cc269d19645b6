use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use rand::Rng as _;
use sha2::{Digest as _, Sha256};

use crate::domain::repository::{TokenRepository, UserRepository};
use crate::domain::types::{SCOPE_AUTHENTICATION, Token, User};
use crate::error::BankServiceError;
use crate::usecase::user::verify_secret;

/// Plaintext handed to the client once; only its digest is ever stored.
pub fn generate_plaintext() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn token_digest(plaintext: &str) -> Vec<u8> {
    Sha256::digest(plaintext.as_bytes()).to_vec()
}

pub struct IssuedToken {
    pub plaintext: String,
    pub expiry: DateTime<Utc>,
}

// ── IssueToken ───────────────────────────────────────────────────────────────

pub struct IssueTokenUseCase<U: UserRepository, T: TokenRepository> {
    pub users: U,
    pub tokens: T,
}

impl<U: UserRepository, T: TokenRepository> IssueTokenUseCase<U, T> {
    pub async fn execute(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IssuedToken, BankServiceError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(BankServiceError::AuthenticationError)?;
        if !verify_secret(password, &user.password_hash)? {
            return Err(BankServiceError::AuthenticationError);
        }

        let plaintext = generate_plaintext();
        let expiry = Utc::now() + Duration::hours(24);
        self.tokens
            .insert(&Token {
                hash: token_digest(&plaintext),
                user_id: user.id,
                scope: SCOPE_AUTHENTICATION.to_owned(),
                expiry,
            })
            .await?;
        Ok(IssuedToken { plaintext, expiry })
    }
}

// ── Authenticate ─────────────────────────────────────────────────────────────

pub struct AuthenticateUseCase<T: TokenRepository> {
    pub tokens: T,
}

impl<T: TokenRepository> AuthenticateUseCase<T> {
    pub async fn execute(&self, plaintext: &str) -> Result<User, BankServiceError> {
        let digest = token_digest(plaintext);
        let Some((user, expiry)) = self
            .tokens
            .find_user(SCOPE_AUTHENTICATION, &digest)
            .await?
        else {
            return Err(BankServiceError::InvalidToken);
        };
        if expiry <= Utc::now() {
            return Err(BankServiceError::ExpiredToken);
        }
        Ok(user)
    }
}
