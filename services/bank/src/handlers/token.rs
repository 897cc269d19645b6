use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use kolo_core::envelope;

use crate::error::BankServiceError;
use crate::extract::Json;
use crate::state::AppState;
use crate::usecase::token::IssueTokenUseCase;

// ── POST /v1/tokens/authentication ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct AuthenticationRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthenticationResponse {
    pub token: String,
    #[serde(serialize_with = "kolo_core::serde::to_rfc3339_ms")]
    pub expiry: chrono::DateTime<chrono::Utc>,
}

pub async fn create_authentication_token(
    State(state): State<AppState>,
    Json(body): Json<AuthenticationRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), BankServiceError> {
    let usecase = IssueTokenUseCase {
        users: state.user_repo(),
        tokens: state.token_repo(),
    };
    let issued = usecase.execute(&body.email, &body.password).await?;
    let data = AuthenticationResponse {
        token: issued.plaintext,
        expiry: issued.expiry,
    };
    Ok((StatusCode::CREATED, Json(envelope::success(data))))
}
