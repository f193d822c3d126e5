use axum::Json;
use serde_json::{Value, json};

#[tracing::instrument(name = "[GET] health")]
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
