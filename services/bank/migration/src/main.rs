use sea_orm_migration::prelude::*;

mod m20260815_000001_create_users;
mod m20260815_000002_create_tokens;
mod m20260815_000003_create_user_details;
mod m20260815_000004_create_transactions;
mod m20260815_000005_create_limit_upgrade_requests;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260815_000001_create_users::Migration),
            Box::new(m20260815_000002_create_tokens::Migration),
            Box::new(m20260815_000003_create_user_details::Migration),
            Box::new(m20260815_000004_create_transactions::Migration),
            Box::new(m20260815_000005_create_limit_upgrade_requests::Migration),
        ]
    }
}

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
