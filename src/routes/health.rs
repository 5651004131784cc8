use axum::{response::IntoResponse, Json};

#[tracing::instrument(name = "Health", skip_all)]
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "message": "Manufacturing & Quality Document Vault Auth API",
        "version": "1.0.0"
    }))
}
