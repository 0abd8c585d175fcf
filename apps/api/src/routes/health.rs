use axum::Json;
use serde_json::{json, Value};

use crate::render::TemplateId;

/// GET /health
/// Returns a simple status object with service version and available templates.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-api",
        "templates": TemplateId::ALL.map(TemplateId::as_str)
    }))
}
