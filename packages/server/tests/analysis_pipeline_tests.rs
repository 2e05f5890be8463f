//! End-to-end pipeline tests over stubbed capability providers.

use std::sync::Arc;
use std::time::Duration;

use server_core::common::types::TriState;
use server_core::domains::analysis::{self, FlagsReport};
use server_core::kernel::jobs::{Job, JobStatus, JobStore};
use server_core::kernel::test_dependencies::{
    ScriptedModelInvoker, StubContentExtractor, StubFlagScreener, StubStreetImagery,
};
use server_core::kernel::{BaseStreetImagery, ServerDeps, SiteContent};

const SUMMARY_JSON: &str = r#"{
    "business_name": "Acme Widgets Ltd",
    "description": "Manufactures industrial widgets for the UK market.",
    "products_services": ["widgets", "widget servicing"],
    "operating_countries": ["United Kingdom"],
    "counterparty_countries": ["Germany", "France"],
    "industry": "manufacturing"
}"#;

const NAICS_JSON: &str = r#"{
    "candidates": [
        {"code": "332999", "title": "All Other Miscellaneous Fabricated Metal Product Manufacturing", "confidence": "high"},
        {"code": "333517", "title": "Machine Tool Manufacturing", "confidence": "low"}
    ],
    "primary": {"code": "332999", "title": "All Other Miscellaneous Fabricated Metal Product Manufacturing", "confidence": "high"},
    "reasoning": "The business manufactures metal widgets."
}"#;

const REGISTRATION_JSON: &str = r#"{
    "company_name": "Acme Widgets Ltd",
    "company_number": "99999999",
    "vat_number": null,
    "eori_number": null,
    "established_date": null,
    "country": "United Kingdom"
}"#;

const EMPTY_REGISTRATION_JSON: &str = r#"{
    "company_name": null,
    "company_number": null,
    "vat_number": null,
    "eori_number": null,
    "established_date": null,
    "country": null
}"#;

const PLAUSIBILITY_JSON: &str = r#"{
    "is_commercial": true,
    "confidence": "high",
    "classification": "commercial street address",
    "reasoning": "Numbered premises on a named street.",
    "indicators": ["street number"]
}"#;

fn widget_site() -> SiteContent {
    SiteContent {
        homepage: "Acme Widgets makes industrial widgets. Company No: 12345678. Established in 1987.".to_string(),
        about: "Family-run widget manufacturer serving UK industry.".to_string(),
        contact: "Visit us at 123 Main Street, Springfield, IL 62704 or call us.".to_string(),
        products: "Widgets, brackets, and fasteners.".to_string(),
    }
}

fn no_address_site() -> SiteContent {
    SiteContent {
        homepage: "We make artisanal software, remotely, everywhere.".to_string(),
        about: "A fully distributed team.".to_string(),
        contact: "Email hello at example dot com.".to_string(),
        products: String::new(),
    }
}

fn build_deps(
    extractor: StubContentExtractor,
    model: Arc<ScriptedModelInvoker>,
    imagery: Option<Arc<StubStreetImagery>>,
) -> (Arc<ServerDeps>, Arc<StubContentExtractor>, Arc<StubFlagScreener>) {
    let extractor = Arc::new(extractor);
    let screener = Arc::new(StubFlagScreener::with_report(FlagsReport::default()));
    let deps = Arc::new(ServerDeps::new(
        extractor.clone(),
        model,
        screener.clone(),
        imagery.map(|i| i as Arc<dyn BaseStreetImagery>),
    ));
    (deps, extractor, screener)
}

async fn wait_for_terminal(store: &JobStore, job: &Job) -> Job {
    for _ in 0..200 {
        if let Some(current) = store.get(job.id).await {
            if current.status.is_terminal() {
                return current;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job never reached a terminal state");
}

#[tokio::test]
async fn happy_path_produces_full_result() {
    let model = Arc::new(ScriptedModelInvoker::new(vec![
        SUMMARY_JSON,
        NAICS_JSON,
        REGISTRATION_JSON,
        PLAUSIBILITY_JSON,
    ]));
    let (deps, extractor, screener) = build_deps(
        StubContentExtractor::with_content(widget_site()),
        model.clone(),
        Some(Arc::new(StubStreetImagery::new(
            20_000,
            vec!["establishment".into()],
        ))),
    );
    let store = JobStore::new();

    let job = analysis::submit(deps, store.clone(), "https://acme-widgets.example").await;
    let finished = wait_for_terminal(&store, &job).await;

    assert_eq!(finished.status, JobStatus::Completed);
    assert_eq!(finished.progress, 100);
    assert!(finished.error.is_none());
    assert_eq!(extractor.calls(), 1);
    assert_eq!(screener.calls(), 1);

    let result = finished.result.expect("completed job must carry a result");
    assert_eq!(result.summary.business_name, "Acme Widgets Ltd");
    assert_eq!(result.summary.operating_countries, vec!["United Kingdom"]);
    assert_eq!(result.naics.primary.code, "332999");
    assert_eq!(result.naics.candidates.len(), 2);

    // Regex wins over the scripted model's conflicting company number.
    let registration = result.company_registration.expect("registration present");
    assert_eq!(registration.company_number.as_deref(), Some("12345678"));
    assert_eq!(registration.company_name.as_deref(), Some("Acme Widgets Ltd"));
    assert_eq!(registration.established_date.as_deref(), Some("1987"));

    assert_eq!(
        result.address.address.as_deref(),
        Some("123 Main Street, Springfield, IL 62704")
    );
    assert_eq!(result.address.extraction_method.as_deref(), Some("pattern"));
    assert_eq!(result.address.validation.valid, TriState::Confirmed);
    assert_eq!(result.address.validation.is_commercial, TriState::Confirmed);
    assert_eq!(result.address.validation.makes_sense, Some(true));
    assert_eq!(
        result.address.validation.place_types,
        vec!["establishment".to_string()]
    );

    // summary, classification, registration backfill, plausibility -
    // the pattern hit means the model address strategy never runs.
    assert_eq!(model.calls(), 4);

    // The poll-visible log carries the operational trail, not just
    // the stage checkpoints.
    let messages: Vec<&str> = finished.logs.iter().map(|l| l.message.as_str()).collect();
    assert!(messages
        .iter()
        .any(|m| m.contains("Starting analysis for https://acme-widgets.example")));
    assert!(messages
        .iter()
        .any(|m| m.contains("Address found via pattern: 123 Main Street")));
    assert!(messages
        .iter()
        .any(|m| m.contains("Company registration: found 4 field(s)")));
    assert!(messages
        .iter()
        .any(|m| m.contains("Address confirmed by street imagery")));
}

#[tokio::test]
async fn scrape_failure_freezes_progress_at_first_checkpoint() {
    let model = Arc::new(ScriptedModelInvoker::new(vec![]));
    let (deps, extractor, screener) = build_deps(
        StubContentExtractor::failing("timeout fetching page"),
        model.clone(),
        None,
    );
    let store = JobStore::new();

    let job = analysis::submit(deps, store.clone(), "https://unreachable.example").await;
    let finished = wait_for_terminal(&store, &job).await;

    assert_eq!(finished.status, JobStatus::Failed);
    assert_eq!(finished.progress, 10);
    assert!(finished.error.unwrap().contains("timeout"));
    assert!(finished.result.is_none());
    assert_eq!(extractor.calls(), 1);
    assert_eq!(model.calls(), 0);
    assert_eq!(screener.calls(), 0);
}

#[tokio::test]
async fn unparseable_summary_fails_at_summary_checkpoint() {
    let model = Arc::new(ScriptedModelInvoker::new(vec![
        "I could not find any JSON to give you.",
    ]));
    let (deps, _, screener) = build_deps(
        StubContentExtractor::with_content(widget_site()),
        model,
        None,
    );
    let store = JobStore::new();

    let job = analysis::submit(deps, store.clone(), "https://acme-widgets.example").await;
    let finished = wait_for_terminal(&store, &job).await;

    assert_eq!(finished.status, JobStatus::Failed);
    assert_eq!(finished.progress, 20);
    assert!(finished.error.unwrap().contains("summary"));
    // Failed before the screening stage.
    assert_eq!(screener.calls(), 0);
}

#[tokio::test]
async fn missing_address_degrades_instead_of_failing() {
    let model = Arc::new(ScriptedModelInvoker::new(vec![
        SUMMARY_JSON,
        NAICS_JSON,
        EMPTY_REGISTRATION_JSON,
        "none",
    ]));
    let (deps, _, _) = build_deps(
        StubContentExtractor::with_content(no_address_site()),
        model.clone(),
        Some(Arc::new(StubStreetImagery::new(20_000, vec![]))),
    );
    let store = JobStore::new();

    let job = analysis::submit(deps, store.clone(), "https://nowhere.example").await;
    let finished = wait_for_terminal(&store, &job).await;

    assert_eq!(finished.status, JobStatus::Completed);
    let result = finished.result.unwrap();

    assert!(result.company_registration.is_none());
    assert!(result.address.address.is_none());
    assert!(result.address.extraction_method.is_none());
    assert_eq!(result.address.validation.valid, TriState::Denied);
    assert_eq!(result.address.validation.makes_sense, None);
    assert!(result
        .address
        .validation
        .notes
        .iter()
        .any(|n| n.contains("No address found")));

    // summary, classification, registration backfill, model address
    // strategy - no plausibility call without an address.
    assert_eq!(model.calls(), 4);
}

#[tokio::test]
async fn missing_imagery_credential_leaves_validity_unknown() {
    let model = Arc::new(ScriptedModelInvoker::new(vec![
        SUMMARY_JSON,
        NAICS_JSON,
        REGISTRATION_JSON,
    ]));
    let (deps, _, _) = build_deps(
        StubContentExtractor::with_content(widget_site()),
        model.clone(),
        None,
    );
    let store = JobStore::new();

    let job = analysis::submit(deps, store.clone(), "https://acme-widgets.example").await;
    let finished = wait_for_terminal(&store, &job).await;

    assert_eq!(finished.status, JobStatus::Completed);
    let result = finished.result.unwrap();

    assert_eq!(result.address.validation.valid, TriState::Unknown);
    assert_eq!(result.address.validation.is_commercial, TriState::Unknown);
    assert!(result.address.validation.method.is_none());
    assert!(result
        .address
        .validation
        .notes
        .iter()
        .any(|n| n.contains("not configured")));
    assert!(result.address.validation.place_types.is_empty());

    // No plausibility call without a geocoding credential.
    assert_eq!(model.calls(), 3);
}

#[tokio::test]
async fn progress_checkpoints_appear_in_order() {
    let model = Arc::new(ScriptedModelInvoker::new(vec![
        SUMMARY_JSON,
        NAICS_JSON,
        REGISTRATION_JSON,
    ]));
    let (deps, _, _) = build_deps(
        StubContentExtractor::with_content(widget_site()),
        model,
        None,
    );
    let store = JobStore::new();

    let job = analysis::submit(deps, store.clone(), "https://acme-widgets.example").await;
    let finished = wait_for_terminal(&store, &job).await;

    let messages: Vec<&str> = finished.logs.iter().map(|l| l.message.as_str()).collect();
    let scraping = messages.iter().position(|m| m.contains("Scraping"));
    let summary = messages.iter().position(|m| m.contains("summary"));
    let classify = messages.iter().position(|m| m.contains("Classifying"));
    let done = messages.iter().position(|m| m.contains("completed"));

    assert!(scraping.is_some() && summary.is_some() && classify.is_some() && done.is_some());
    assert!(scraping < summary);
    assert!(summary < classify);
    assert!(classify < done);
}
