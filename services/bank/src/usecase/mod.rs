pub mod account;
pub mod history;
pub mod limit;
pub mod token;
pub mod transfer;
pub mod user;
