use axum::Json;
use serde_json::{json, Value};

/// GET /health, GET /healthz
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "ok": true,
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "journal-api"
    }))
}
