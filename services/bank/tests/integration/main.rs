mod helpers;

mod account_test;
mod limit_test;
mod transfer_test;
