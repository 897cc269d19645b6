//! SeaORM entities for the bank service database.

pub mod limit_upgrade_requests;
pub mod tokens;
pub mod transactions;
pub mod user_details;
pub mod users;
