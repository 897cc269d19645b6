use kolo_domain::pagination::PageRequest;

use crate::domain::repository::{AccountRepository, TransactionRepository};
use crate::domain::types::{Transaction, User};
use crate::error::BankServiceError;

/// Paged transaction history for one of the caller's own accounts.
pub struct GetHistoryUseCase<A: AccountRepository, T: TransactionRepository> {
    pub accounts: A,
    pub transactions: T,
}

impl<A: AccountRepository, T: TransactionRepository> GetHistoryUseCase<A, T> {
    pub async fn execute(
        &self,
        user: &User,
        account_number: &str,
        page: PageRequest,
    ) -> Result<Vec<Transaction>, BankServiceError> {
        let details = self
            .accounts
            .find_details(user.id)
            .await?
            .ok_or(BankServiceError::NotFound)?;
        if details.account_number != account_number {
            return Err(BankServiceError::UnauthorizedAccountNo);
        }

        let transactions = self
            .transactions
            .list_by_account(account_number, page)
            .await?;
        // Legacy behavior: an empty page reads as not found.
        if transactions.is_empty() {
            return Err(BankServiceError::NotFound);
        }
        Ok(transactions)
    }
}
