use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Serialize;

use kolo_core::bearer::BearerToken;
use kolo_core::envelope;
use kolo_domain::pagination::PageRequest;

use crate::domain::types::Transaction;
use crate::error::BankServiceError;
use crate::state::AppState;
use crate::usecase::history::GetHistoryUseCase;

// ── GET /v1/accounts/{account_number}/history ────────────────────────────────

#[derive(Serialize)]
pub struct TransactionResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: &'static str,
    pub source: &'static str,
    pub narration: String,
    pub account_number: String,
    pub internal_reference: String,
    pub external_reference: Option<String>,
    pub amount: Decimal,
    pub status: &'static str,
    #[serde(serialize_with = "kolo_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(txn: Transaction) -> Self {
        TransactionResponse {
            id: txn.id.to_string(),
            transaction_type: txn.transaction_type.as_str(),
            source: txn.source.as_str(),
            narration: txn.narration,
            account_number: txn.account_number,
            internal_reference: txn.internal_reference,
            external_reference: txn.external_reference,
            amount: txn.amount,
            status: txn.status.as_str(),
            created_at: txn.created_at,
        }
    }
}

pub async fn get_history(
    bearer: Option<BearerToken>,
    State(state): State<AppState>,
    Path(account_number): Path<String>,
    Query(page): Query<PageRequest>,
) -> Result<Json<serde_json::Value>, BankServiceError> {
    let caller = super::caller(&state, bearer).await?;
    let user = caller.require_user()?;

    let usecase = GetHistoryUseCase {
        accounts: state.account_repo(),
        transactions: state.transaction_repo(),
    };
    let transactions = usecase.execute(user, &account_number, page).await?;
    let data: Vec<TransactionResponse> =
        transactions.into_iter().map(TransactionResponse::from).collect();
    Ok(Json(envelope::success(data)))
}
