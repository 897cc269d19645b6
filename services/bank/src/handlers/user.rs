use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use kolo_core::envelope;

use crate::error::BankServiceError;
use crate::extract::Json;
use crate::state::AppState;
use crate::usecase::user::{RegisterUserInput, RegisterUserUseCase};

// ── POST /v1/users ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub device_id: String,
    pub device_os: String,
    pub device_name: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub activated: bool,
    pub kyc_level: i16,
    #[serde(serialize_with = "kolo_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), BankServiceError> {
    let usecase = RegisterUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(RegisterUserInput {
            name: body.name,
            username: body.username,
            email: body.email,
            password: body.password,
            device_id: body.device_id,
            device_os: body.device_os,
            device_name: body.device_name,
        })
        .await?;

    let data = UserResponse {
        id: user.id.to_string(),
        name: user.name,
        username: user.username,
        email: user.email,
        activated: user.activated,
        kyc_level: user.kyc_level,
        created_at: user.created_at,
    };
    Ok((StatusCode::CREATED, Json(envelope::success(data))))
}
