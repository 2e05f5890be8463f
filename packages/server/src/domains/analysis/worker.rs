//! Background worker driving the analysis pipeline.
//!
//! Stage order and failure policy:
//!   scrape -> summary -> flags -> classification   (fatal on error)
//!   registration -> address -> validation          (degrade to absent)
//!
//! Each stage records a progress checkpoint before it runs, so a
//! failed job's progress shows exactly which stage broke.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::common::types::TriState;
use crate::domains::extraction::address::address_cascade;
use crate::domains::extraction::registration::extract_registration;
use crate::domains::extraction::validator::validate_address;
use crate::kernel::jobs::{Job, JobStatus, JobStore};
use crate::kernel::ServerDeps;

use super::types::{AddressReport, AddressValidation, AnalysisResult};
use super::{naics, summarizer};

/// Register a job for the URL and run the pipeline in the background.
pub async fn submit(deps: Arc<ServerDeps>, store: Arc<JobStore>, url: impl Into<String>) -> Job {
    let job = store.create(url).await;
    let job_id = job.id;
    let job_url = job.url.clone();

    tokio::spawn(async move {
        run(deps, store, job_id, job_url).await;
    });

    job
}

#[instrument(skip(deps, store), fields(job_id = %job_id))]
async fn run(deps: Arc<ServerDeps>, store: Arc<JobStore>, job_id: uuid::Uuid, url: String) {
    match run_pipeline(&deps, &store, job_id, &url).await {
        Ok(result) => {
            store.complete(job_id, result).await;
        }
        Err(e) => {
            warn!(error = %format!("{:#}", e), "pipeline failed");
            store.fail(job_id, format!("{:#}", e)).await;
        }
    }
}

async fn run_pipeline(
    deps: &ServerDeps,
    store: &JobStore,
    job_id: uuid::Uuid,
    url: &str,
) -> Result<AnalysisResult> {
    store
        .add_log(job_id, format!("Starting analysis for {}", url))
        .await;
    store
        .update_status(job_id, JobStatus::Processing, 10, "Scraping website...")
        .await;
    let content = deps
        .content_extractor
        .extract(url)
        .await
        .context("Failed to scrape website")?;

    store
        .update_status(
            job_id,
            JobStatus::Processing,
            20,
            "Generating business summary...",
        )
        .await;
    let summary = summarizer::summarize(deps.model.as_ref(), &content)
        .await
        .context("Failed to generate business summary")?;

    store
        .update_status(
            job_id,
            JobStatus::Processing,
            40,
            "Screening for compliance flags...",
        )
        .await;
    let flags = deps
        .flag_screener
        .screen(&content)
        .await
        .context("Failed to screen compliance flags")?;
    if flags.any_flags {
        store.add_log(job_id, "Compliance flags raised").await;
    }

    store
        .update_status(job_id, JobStatus::Processing, 60, "Classifying industry...")
        .await;
    let classification = naics::classify(deps.model.as_ref(), &summary)
        .await
        .context("Failed to classify industry")?;

    store
        .update_status(
            job_id,
            JobStatus::Processing,
            70,
            "Extracting company registration details...",
        )
        .await;
    let registration = extract_registration(deps.model.as_ref(), &content.combined()).await;
    match &registration {
        Some(found) => {
            store
                .add_log(
                    job_id,
                    format!("Company registration: found {} field(s)", found.field_count()),
                )
                .await;
        }
        None => {
            store
                .add_log(job_id, "Company registration: no details found")
                .await;
        }
    }

    store
        .update_status(
            job_id,
            JobStatus::Processing,
            80,
            "Extracting business address...",
        )
        .await;
    let resolved = address_cascade(deps.model.clone())
        .resolve(&content.combined_for_address())
        .await;

    store
        .update_status(job_id, JobStatus::Processing, 95, "Validating address...")
        .await;
    let address = match resolved {
        Some(found) => {
            store
                .add_log(
                    job_id,
                    format!("Address found via {}: {}", found.method, found.value),
                )
                .await;
            let validation = validate_address(deps, &found.value, &summary).await;
            if validation.valid.is_confirmed() {
                store
                    .add_log(job_id, "Address confirmed by street imagery")
                    .await;
            } else if validation.valid.is_unknown() {
                store
                    .add_log(job_id, "Address validity could not be determined")
                    .await;
            }
            AddressReport {
                address: Some(found.value),
                extraction_method: Some(found.method.to_string()),
                validation,
            }
        }
        None => AddressReport {
            address: None,
            extraction_method: None,
            validation: AddressValidation {
                valid: TriState::Denied,
                is_commercial: TriState::Unknown,
                makes_sense: None,
                place_types: Vec::new(),
                notes: vec!["No address found on website".to_string()],
                method: None,
            },
        },
    };

    info!(url = %url, "analysis pipeline finished");

    Ok(AnalysisResult {
        url: url.to_string(),
        timestamp: Utc::now(),
        summary,
        naics: classification,
        flags,
        address,
        company_registration: registration,
    })
}
