use std::time::Duration;

use sea_orm::{ConnectOptions, Database};
use tracing::info;

use kolo_bank::config::BankConfig;
use kolo_bank::infra::gateway::HttpPaymentGateway;
use kolo_bank::router::build_router;
use kolo_bank::state::AppState;

#[tokio::main]
async fn main() {
    kolo_core::tracing::init_tracing();

    let config = BankConfig::from_env();

    let mut options = ConnectOptions::new(&config.database_url);
    options
        .connect_timeout(Duration::from_secs(3))
        .acquire_timeout(Duration::from_secs(3));
    let db = Database::connect(options)
        .await
        .expect("failed to connect to database");

    let gateway =
        HttpPaymentGateway::new(&config.gateway_base_url).expect("failed to build gateway client");

    let state = AppState { db, gateway };
    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.bank_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("bank service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
