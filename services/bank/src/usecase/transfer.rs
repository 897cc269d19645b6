use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use kolo_domain::limits::{Channel, Counter};

use crate::domain::repository::{
    AccountRepository, GatewayTransfer, LedgerRepository, PaymentGateway, TransactionRepository,
};
use crate::domain::types::{
    Transaction, TransactionStatus, TransactionType, TransferFields, User, validate_transfer,
};
use crate::error::BankServiceError;
use crate::usecase::limit::check_and_reserve;
use crate::usecase::user::verify_secret;

pub struct TransferInput {
    pub senders_account_no: String,
    pub receiver_account_no: String,
    /// Decimal amount as text; parsed and range-checked during validation.
    pub amount: String,
    pub narration: String,
    pub pin: String,
}

#[derive(Debug)]
pub struct TransferReceipt {
    pub transaction_id: Uuid,
    pub internal_reference: String,
    pub external_reference: String,
    pub amount: Decimal,
    pub counter: Counter,
}

/// The transfer authorization flow: authenticate, validate, verify the PIN,
/// assert account ownership, reserve against the daily counter, call the
/// gateway, and record the attempt. A gateway failure rolls the reservation
/// back and records a failed row.
pub struct TransferUseCase<A, L, T, G>
where
    A: AccountRepository,
    L: LedgerRepository,
    T: TransactionRepository,
    G: PaymentGateway,
{
    pub accounts: A,
    pub ledger: L,
    pub transactions: T,
    pub gateway: G,
}

impl<A, L, T, G> TransferUseCase<A, L, T, G>
where
    A: AccountRepository,
    L: LedgerRepository,
    T: TransactionRepository,
    G: PaymentGateway,
{
    pub async fn execute(
        &self,
        user: &User,
        request_id: &str,
        input: TransferInput,
    ) -> Result<TransferReceipt, BankServiceError> {
        let (errors, amount) = validate_transfer(&TransferFields {
            senders_account_no: &input.senders_account_no,
            receiver_account_no: &input.receiver_account_no,
            amount: &input.amount,
            narration: &input.narration,
            pin: &input.pin,
        });
        let amount = match (errors.is_empty(), amount) {
            (true, Some(amount)) => amount,
            _ => return Err(BankServiceError::Validation(errors)),
        };

        let details = self
            .accounts
            .find_details(user.id)
            .await?
            .ok_or(BankServiceError::NotFound)?;
        let Some(pin_hash) = &details.transaction_pin else {
            return Err(BankServiceError::TransactionPinNotSet);
        };
        if !verify_secret(&input.pin, pin_hash)? {
            return Err(BankServiceError::InvalidTransferPin);
        }
        if input.senders_account_no != details.account_number {
            return Err(BankServiceError::UnauthorizedAccountNo);
        }

        let counter =
            check_and_reserve(&self.ledger, user.id, Channel::Transfers, amount).await?;

        let now = Utc::now();
        let transaction_id = Uuid::new_v4();
        let internal_reference = Uuid::new_v4().simple().to_string();
        let attempt = Transaction {
            id: transaction_id,
            user_id: user.id,
            transaction_type: TransactionType::Debit,
            source: Channel::Transfers,
            narration: input.narration.clone(),
            account_number: details.account_number.clone(),
            request_id: request_id.to_owned(),
            internal_reference: internal_reference.clone(),
            external_reference: None,
            amount,
            status: TransactionStatus::Failed,
            commission: None,
            balance_after: None,
            created_at: now,
            updated_at: now,
        };

        let settlement = self
            .gateway
            .transfer(&GatewayTransfer {
                from_account_number: input.senders_account_no.clone(),
                to_account_number: input.receiver_account_no.clone(),
                amount,
                description: input.narration.clone(),
            })
            .await;

        match settlement {
            Ok(settlement) => {
                let settled = Transaction {
                    status: TransactionStatus::Success,
                    external_reference: Some(settlement.external_reference.clone()),
                    ..attempt
                };
                // Money has moved; a recording failure is logged, never
                // surfaced as a transfer failure.
                if let Err(e) = self.transactions.insert(&settled).await {
                    tracing::error!(
                        error = %e,
                        transaction_id = %transaction_id,
                        "failed to record settled transfer"
                    );
                }
                Ok(TransferReceipt {
                    transaction_id,
                    internal_reference,
                    external_reference: settlement.external_reference,
                    amount,
                    counter,
                })
            }
            Err(gateway_error) => {
                if let Err(e) = self
                    .ledger
                    .release(user.id, Channel::Transfers, amount)
                    .await
                {
                    tracing::error!(
                        error = %e,
                        user_id = %user.id,
                        "failed to release reserved counter after gateway failure"
                    );
                }
                if let Err(e) = self.transactions.insert(&attempt).await {
                    tracing::error!(
                        error = %e,
                        transaction_id = %transaction_id,
                        "failed to record failed transfer"
                    );
                }
                Err(gateway_error)
            }
        }
    }
}
