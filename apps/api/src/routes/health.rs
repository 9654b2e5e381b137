use axum::Json;
use serde_json::{json, Value};

/// GET /api/health
/// Liveness check for the web client; also reports which build is answering.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "message": "PrepAI API is running!",
        "service": env!("CARGO_PKG_NAME"),
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
