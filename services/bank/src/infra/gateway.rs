use serde::{Deserialize, Serialize};

use crate::domain::repository::{GatewaySettlement, GatewayTransfer, PaymentGateway};
use crate::error::BankServiceError;

/// HTTP client for the upstream payment gateway. The wire format keeps the
/// legacy camelCase field names.
#[derive(Clone)]
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPaymentGateway {
    pub fn new(base_url: &str) -> Result<Self, BankServiceError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(3))
            .build()
            .map_err(|e| anyhow::Error::new(e).context("build gateway client"))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireTransferRequest<'a> {
    from_account_number: &'a str,
    to_account_number: &'a str,
    transaction_amount: String,
    transaction_description: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTransferResponse {
    transaction_reference: String,
}

impl PaymentGateway for HttpPaymentGateway {
    async fn transfer(
        &self,
        request: &GatewayTransfer,
    ) -> Result<GatewaySettlement, BankServiceError> {
        let url = format!("{}/transfer", self.base_url);
        let body = WireTransferRequest {
            from_account_number: &request.from_account_number,
            to_account_number: &request.to_account_number,
            transaction_amount: request.amount.to_string(),
            transaction_description: &request.description,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BankServiceError::GatewayFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(BankServiceError::GatewayFailure(format!(
                "gateway responded {status}: {detail}"
            )));
        }

        let settled: WireTransferResponse = response
            .json()
            .await
            .map_err(|e| BankServiceError::GatewayFailure(e.to_string()))?;
        Ok(GatewaySettlement {
            external_reference: settled.transaction_reference,
        })
    }
}
