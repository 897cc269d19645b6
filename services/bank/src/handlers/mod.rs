pub mod account;
pub mod history;
pub mod limit;
pub mod system;
pub mod token;
pub mod transfer;
pub mod user;

use kolo_core::bearer::BearerToken;

use crate::domain::types::Caller;
use crate::error::BankServiceError;
use crate::state::AppState;
use crate::usecase::token::AuthenticateUseCase;

/// Resolve the request's caller from an optional bearer token. A missing
/// header is an anonymous caller; a presented token must resolve to a live
/// user or the request fails.
pub(crate) async fn caller(
    state: &AppState,
    bearer: Option<BearerToken>,
) -> Result<Caller, BankServiceError> {
    match bearer {
        None => Ok(Caller::Anonymous),
        Some(BearerToken(plaintext)) => {
            let usecase = AuthenticateUseCase {
                tokens: state.token_repo(),
            };
            let user = usecase.execute(&plaintext).await?;
            Ok(Caller::User(user))
        }
    }
}
