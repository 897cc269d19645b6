use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use kolo_core::bearer::BearerToken;
use kolo_core::envelope;

use crate::error::BankServiceError;
use crate::extract::Json;
use crate::state::AppState;
use crate::usecase::account::{
    ChangePinUseCase, GetProfileUseCase, OpenAccountInput, OpenAccountUseCase, SetPinUseCase,
};

/// Base backoff for the background persistence task.
const PERSIST_BACKOFF: std::time::Duration = std::time::Duration::from_millis(200);

// ── POST /v1/accounts ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct OpenAccountRequest {
    pub surname: String,
    pub firstname: String,
    pub address: String,
    pub city: String,
    pub phone_number: String,
    pub bvn: String,
}

pub async fn open_account(
    bearer: Option<BearerToken>,
    State(state): State<AppState>,
    Json(body): Json<OpenAccountRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), BankServiceError> {
    let caller = super::caller(&state, bearer).await?;
    let user = caller.require_user()?;
    let user_id = user.id;

    let usecase = OpenAccountUseCase {
        repo: state.account_repo(),
        retry_backoff: PERSIST_BACKOFF,
    };
    let details = usecase
        .prepare(
            user_id,
            &OpenAccountInput {
                surname: body.surname,
                firstname: body.firstname,
                address: body.address,
                city: body.city,
                phone_number: body.phone_number,
                bvn: body.bvn,
            },
        )
        .await?;
    let account_number = details.account_number.clone();

    // The response does not block on persistence; the task retries with
    // backoff and dead-letters to the log on exhaustion.
    tokio::spawn(async move {
        match usecase.persist_with_retry(details).await {
            Ok(persisted) => {
                tracing::info!(
                    user_id = %user_id,
                    account_number = %persisted.account_number,
                    "account details persisted"
                );
            }
            Err(e) => {
                tracing::error!(
                    user_id = %user_id,
                    error = %e,
                    "account persistence dead-lettered"
                );
            }
        }
    });

    let data = serde_json::json!({ "account_number": account_number });
    Ok((StatusCode::CREATED, Json(envelope::success(data))))
}

// ── GET /v1/accounts/profile ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProfileResponse {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub kyc_level: i16,
    pub account_number: String,
}

pub async fn get_profile(
    bearer: Option<BearerToken>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, BankServiceError> {
    let caller = super::caller(&state, bearer).await?;
    let user = caller.require_user()?;

    let usecase = GetProfileUseCase {
        repo: state.account_repo(),
    };
    let profile = usecase.execute(user.id).await?;
    let data = ProfileResponse {
        name: profile.name,
        username: profile.username,
        email: profile.email,
        phone_number: profile.phone_number,
        kyc_level: profile.kyc_level,
        account_number: profile.account_number,
    };
    Ok(Json(envelope::success(data)))
}

// ── POST /v1/accounts/pin ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetPinRequest {
    pub pin: String,
}

pub async fn set_pin(
    bearer: Option<BearerToken>,
    State(state): State<AppState>,
    Json(body): Json<SetPinRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), BankServiceError> {
    let caller = super::caller(&state, bearer).await?;
    let user = caller.require_user()?;

    let usecase = SetPinUseCase {
        repo: state.account_repo(),
    };
    usecase.execute(user.id, &body.pin).await?;
    let data = serde_json::json!({ "message": "transaction PIN set" });
    Ok((StatusCode::CREATED, Json(envelope::success(data))))
}

// ── PUT /v1/accounts/pin ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChangePinRequest {
    pub old_pin: String,
    pub new_pin: String,
}

pub async fn change_pin(
    bearer: Option<BearerToken>,
    State(state): State<AppState>,
    Json(body): Json<ChangePinRequest>,
) -> Result<Json<serde_json::Value>, BankServiceError> {
    let caller = super::caller(&state, bearer).await?;
    let user = caller.require_user()?;

    let usecase = ChangePinUseCase {
        repo: state.account_repo(),
    };
    usecase.execute(user.id, &body.old_pin, &body.new_pin).await?;
    let data = serde_json::json!({ "message": "transaction PIN changed" });
    Ok(Json(envelope::success(data)))
}
