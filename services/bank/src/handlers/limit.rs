use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kolo_core::bearer::BearerToken;
use kolo_core::envelope;
use kolo_domain::limits::{Counter, Limits};

use crate::domain::types::UpgradeLimitRequest;
use crate::error::BankServiceError;
use crate::extract::Json;
use crate::state::AppState;
use crate::usecase::limit::{
    ApproveLimitUpgradeUseCase, CancelLimitUpgradeUseCase, GetLimitsUseCase,
    RequestLimitUpgradeUseCase,
};

// ── GET /v1/limits ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct LimitsResponse {
    pub limits: Limits,
    pub counter: Counter,
}

pub async fn get_limits(
    bearer: Option<BearerToken>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, BankServiceError> {
    let caller = super::caller(&state, bearer).await?;
    let user = caller.require_user()?;

    let usecase = GetLimitsUseCase {
        ledger: state.ledger_repo(),
    };
    let (limits, counter) = usecase.execute(user.id).await?;
    Ok(Json(envelope::success(LimitsResponse { limits, counter })))
}

// ── POST /v1/limits/upgrade ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LimitUpgradeRequestBody {
    pub channel: String,
    pub single: Decimal,
    pub daily: Decimal,
}

#[derive(Serialize)]
pub struct UpgradeResponse {
    pub id: String,
    pub channel: &'static str,
    pub single: Decimal,
    pub daily: Decimal,
    pub status: &'static str,
    #[serde(serialize_with = "kolo_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "kolo_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<UpgradeLimitRequest> for UpgradeResponse {
    fn from(request: UpgradeLimitRequest) -> Self {
        UpgradeResponse {
            id: request.id.to_string(),
            channel: request.channel.as_str(),
            single: request.single,
            daily: request.daily,
            status: request.status.as_str(),
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

pub async fn request_limit_upgrade(
    bearer: Option<BearerToken>,
    State(state): State<AppState>,
    Json(body): Json<LimitUpgradeRequestBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), BankServiceError> {
    let caller = super::caller(&state, bearer).await?;
    let user = caller.require_user()?;

    let usecase = RequestLimitUpgradeUseCase {
        repo: state.upgrade_repo(),
    };
    let request = usecase
        .execute(user.id, &body.channel, body.single, body.daily)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(envelope::success(UpgradeResponse::from(request))),
    ))
}

// ── POST /v1/limits/upgrade/{id}/approve ─────────────────────────────────────

pub async fn approve_limit_upgrade(
    bearer: Option<BearerToken>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, BankServiceError> {
    let caller = super::caller(&state, bearer).await?;
    caller.require_user()?;

    let usecase = ApproveLimitUpgradeUseCase {
        repo: state.upgrade_repo(),
    };
    let request = usecase.execute(id).await?;
    Ok(Json(envelope::success(UpgradeResponse::from(request))))
}

// ── POST /v1/limits/upgrade/{id}/cancel ──────────────────────────────────────

pub async fn cancel_limit_upgrade(
    bearer: Option<BearerToken>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, BankServiceError> {
    let caller = super::caller(&state, bearer).await?;
    caller.require_user()?;

    let usecase = CancelLimitUpgradeUseCase {
        repo: state.upgrade_repo(),
    };
    let request = usecase.execute(id).await?;
    Ok(Json(envelope::success(UpgradeResponse::from(request))))
}
