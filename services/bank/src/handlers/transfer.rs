use axum::{extract::State, http::HeaderMap};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kolo_core::bearer::BearerToken;
use kolo_core::envelope;
use kolo_domain::limits::Counter;

use crate::error::BankServiceError;
use crate::extract::Json;
use crate::state::AppState;
use crate::usecase::transfer::{TransferInput, TransferUseCase};

// ── POST /v1/transfer ────────────────────────────────────────────────────────

/// Legacy wire body; the field names are part of the boundary contract.
#[derive(Deserialize)]
pub struct TransferRequest {
    pub senders_account_no: String,
    pub receiver_account_no: String,
    pub amount: String,
    pub narration: String,
    pub pin: String,
}

#[derive(Serialize)]
pub struct TransferResponse {
    pub transaction_id: String,
    pub internal_reference: String,
    pub external_reference: String,
    pub amount: Decimal,
    pub counter: Counter,
}

pub async fn transfer(
    bearer: Option<BearerToken>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<TransferRequest>,
) -> Result<Json<serde_json::Value>, BankServiceError> {
    let caller = super::caller(&state, bearer).await?;
    let user = caller.require_user()?;

    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let usecase = TransferUseCase {
        accounts: state.account_repo(),
        ledger: state.ledger_repo(),
        transactions: state.transaction_repo(),
        gateway: state.gateway(),
    };
    let receipt = usecase
        .execute(
            user,
            &request_id,
            TransferInput {
                senders_account_no: body.senders_account_no,
                receiver_account_no: body.receiver_account_no,
                amount: body.amount,
                narration: body.narration,
                pin: body.pin,
            },
        )
        .await?;

    let data = TransferResponse {
        transaction_id: receipt.transaction_id.to_string(),
        internal_reference: receipt.internal_reference,
        external_reference: receipt.external_reference,
        amount: receipt.amount,
        counter: receipt.counter,
    };
    Ok(Json(envelope::success(data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_body_uses_legacy_field_names() {
        let body: TransferRequest = serde_json::from_str(
            r#"{
                "senders_account_no": "0900010001",
                "receiver_account_no": "0900010002",
                "amount": "50000",
                "pin": "1234",
                "narration": "rent"
            }"#,
        )
        .unwrap();

        assert_eq!(body.senders_account_no, "0900010001");
        assert_eq!(body.receiver_account_no, "0900010002");
        assert_eq!(body.amount, "50000");
        assert_eq!(body.pin, "1234");
        assert_eq!(body.narration, "rent");
    }
}
