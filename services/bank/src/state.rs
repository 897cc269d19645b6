use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAccountRepository, DbLedgerRepository, DbTokenRepository, DbTransactionRepository,
    DbUpgradeRequestRepository, DbUserRepository,
};
use crate::infra::gateway::HttpPaymentGateway;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub gateway: HttpPaymentGateway,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn token_repo(&self) -> DbTokenRepository {
        DbTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn account_repo(&self) -> DbAccountRepository {
        DbAccountRepository {
            db: self.db.clone(),
        }
    }

    pub fn ledger_repo(&self) -> DbLedgerRepository {
        DbLedgerRepository {
            db: self.db.clone(),
        }
    }

    pub fn upgrade_repo(&self) -> DbUpgradeRequestRepository {
        DbUpgradeRequestRepository {
            db: self.db.clone(),
        }
    }

    pub fn transaction_repo(&self) -> DbTransactionRepository {
        DbTransactionRepository {
            db: self.db.clone(),
        }
    }

    pub fn gateway(&self) -> HttpPaymentGateway {
        self.gateway.clone()
    }
}
