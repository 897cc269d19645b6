/// Bank service configuration loaded from environment variables.
#[derive(Debug)]
pub struct BankConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 4000). Env var: `BANK_PORT`.
    pub bank_port: u16,
    /// Base URL of the upstream payment gateway (e.g. "http://gateway:8080").
    pub gateway_base_url: String,
}

impl BankConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            bank_port: std::env::var("BANK_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4000),
            gateway_base_url: std::env::var("GATEWAY_BASE_URL").expect("GATEWAY_BASE_URL"),
        }
    }
}
