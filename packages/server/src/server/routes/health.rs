use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::server::app::AppState;

pub async fn health_check(Extension(state): Extension<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "jobs": state.jobs.len().await,
    }))
}
