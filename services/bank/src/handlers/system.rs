use axum::Json;

use kolo_core::envelope;

// ── GET /v1/healthcheck ──────────────────────────────────────────────────────

pub async fn healthcheck() -> Json<serde_json::Value> {
    Json(envelope::success(serde_json::json!({
        "status": "available",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
