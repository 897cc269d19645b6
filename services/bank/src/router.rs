use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use kolo_core::middleware::request_id_layer;

use crate::handlers::{
    account::{change_pin, get_profile, open_account, set_pin},
    history::get_history,
    limit::{approve_limit_upgrade, cancel_limit_upgrade, get_limits, request_limit_upgrade},
    system::healthcheck,
    token::create_authentication_token,
    transfer::transfer,
    user::register_user,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // System
        .route("/v1/healthcheck", get(healthcheck))
        // Users & tokens
        .route("/v1/users", post(register_user))
        .route("/v1/tokens/authentication", post(create_authentication_token))
        // Accounts
        .route("/v1/accounts", post(open_account))
        .route("/v1/accounts/profile", get(get_profile))
        .route("/v1/accounts/pin", post(set_pin).put(change_pin))
        .route("/v1/accounts/{account_number}/history", get(get_history))
        // Limits
        .route("/v1/limits", get(get_limits))
        .route("/v1/limits/upgrade", post(request_limit_upgrade))
        .route("/v1/limits/upgrade/{id}/approve", post(approve_limit_upgrade))
        .route("/v1/limits/upgrade/{id}/cancel", post(cancel_limit_upgrade))
        // Transfers
        .route("/v1/transfer", post(transfer))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
