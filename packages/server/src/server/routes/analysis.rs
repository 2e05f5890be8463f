//! Analysis endpoints: submit a URL, poll status, fetch results.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::domains::analysis;
use crate::kernel::jobs::{JobStatus, LogEntry};
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub job_id: Uuid,
    pub url: String,
    pub status: JobStatus,
    pub progress: u8,
    pub message: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub logs: Vec<LogEntry>,
}

/// POST /analyze - queue a background analysis for a URL.
pub async fn submit_analysis(
    Extension(state): Extension<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<(StatusCode, Json<AnalyzeResponse>), (StatusCode, Json<Value>)> {
    let url = request.url.trim().to_string();
    if url.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "url must not be empty"})),
        ));
    }

    let job = analysis::submit(state.deps.clone(), state.jobs.clone(), url).await;

    Ok((
        StatusCode::ACCEPTED,
        Json(AnalyzeResponse {
            job_id: job.id,
            status: job.status,
            message: "Analysis started".to_string(),
        }),
    ))
}

/// GET /status/:job_id - progress and log trail for a job.
pub async fn job_status(
    Extension(state): Extension<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<StatusResponse>, (StatusCode, Json<Value>)> {
    let job = state
        .jobs
        .get(job_id)
        .await
        .ok_or_else(|| (StatusCode::NOT_FOUND, Json(json!({"error": "job not found"}))))?;

    Ok(Json(StatusResponse {
        job_id: job.id,
        url: job.url,
        status: job.status,
        progress: job.progress,
        message: job.message,
        created_at: job.created_at,
        updated_at: job.updated_at,
        logs: job.logs,
    }))
}

/// GET /results/:job_id - final result once the job is terminal.
pub async fn job_results(
    Extension(state): Extension<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let job = state
        .jobs
        .get(job_id)
        .await
        .ok_or_else(|| (StatusCode::NOT_FOUND, Json(json!({"error": "job not found"}))))?;

    let mut body = json!({
        "job_id": job.id,
        "status": job.status,
    });
    if let Some(result) = job.result {
        body["result"] = serde_json::to_value(result).unwrap_or(Value::Null);
    }
    if let Some(error) = job.error {
        body["error"] = Value::String(error);
    }

    Ok(Json(body))
}
