//! Shared in-memory job store.
//!
//! All state updates pass through these methods, which enforce two
//! invariants: progress never decreases, and a terminal job never
//! changes again.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domains::analysis::types::AnalysisResult;

use super::job::{Job, JobStatus, LogEntry};

#[derive(Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
}

impl JobStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a new queued job for a URL and return a snapshot of it.
    pub async fn create(&self, url: impl Into<String>) -> Job {
        let job = Job::new(url);
        info!(job_id = %job.id, url = %job.url, "job created");
        self.jobs.write().await.insert(job.id, job.clone());
        job
    }

    pub async fn get(&self, id: Uuid) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// Advance a job to a new status/progress/message checkpoint.
    ///
    /// Progress is clamped to be monotonic and the message is appended
    /// to the job's log. Updates to terminal jobs are dropped.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: JobStatus,
        progress: u8,
        message: impl Into<String>,
    ) {
        let message = message.into();
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(&id) else {
            warn!(job_id = %id, "update for unknown job");
            return;
        };
        if job.status.is_terminal() {
            warn!(job_id = %id, "update for terminal job ignored");
            return;
        }

        job.status = status;
        job.progress = job.progress.max(progress);
        job.message = message.clone();
        job.updated_at = Utc::now();
        job.logs.push(LogEntry {
            timestamp: job.updated_at,
            message,
        });
    }

    /// Mark a job completed with its analysis result.
    pub async fn complete(&self, id: Uuid, result: AnalysisResult) {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(&id) else {
            warn!(job_id = %id, "completion for unknown job");
            return;
        };
        if job.status.is_terminal() {
            return;
        }

        job.status = JobStatus::Completed;
        job.progress = 100;
        job.message = "Analysis completed successfully".to_string();
        job.result = Some(result);
        job.updated_at = Utc::now();
        job.logs.push(LogEntry {
            timestamp: job.updated_at,
            message: job.message.clone(),
        });
        info!(job_id = %id, "job completed");
    }

    /// Mark a job failed. Progress stays frozen at the last checkpoint
    /// reached so the failure point is visible.
    pub async fn fail(&self, id: Uuid, error: impl Into<String>) {
        let error = error.into();
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(&id) else {
            warn!(job_id = %id, "failure for unknown job");
            return;
        };
        if job.status.is_terminal() {
            return;
        }

        job.status = JobStatus::Failed;
        job.message = format!("Error: {}", error);
        job.error = Some(error);
        job.updated_at = Utc::now();
        job.logs.push(LogEntry {
            timestamp: job.updated_at,
            message: job.message.clone(),
        });
        warn!(job_id = %id, error = %job.error.as_deref().unwrap_or_default(), "job failed");
    }

    /// Append a log line without touching status or progress.
    pub async fn add_log(&self, id: Uuid, message: impl Into<String>) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(&id) {
            job.updated_at = Utc::now();
            job.logs.push(LogEntry {
                timestamp: job.updated_at,
                message: message.into(),
            });
        }
    }
}
