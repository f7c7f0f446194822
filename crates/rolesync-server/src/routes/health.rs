use axum::Json;

/// GET /healthz — liveness probe.
pub async fn get_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
