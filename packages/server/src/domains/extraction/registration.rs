//! Company registration extraction.
//!
//! Per-field regexes run first; a single model call backfills only
//! the fields the patterns missed. A regex hit is never overwritten.

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use llm_client::Message;
use regex::Regex;
use tracing::{debug, warn};

use crate::common::json::parse_model_json;
use crate::domains::analysis::types::CompanyRegistration;
use crate::kernel::traits::BaseModelInvoker;

/// Characters of site text included in the backfill prompt.
const MODEL_REGISTRATION_CLIP: usize = 10_000;

lazy_static! {
    static ref COMPANY_NUMBER_RE: Regex = Regex::new(
        r"(?i)(?:Company\s*No|Company\s*Reg(?:istration)?\s*No|CRN)[.:\s]*([A-Z0-9]{2,10})"
    )
    .unwrap();
    static ref VAT_RE: Regex = Regex::new(
        r"(?i)VAT\s*(?:No|Number|Reg(?:istration)?(?:\s*No)?)?[.:\s]*((?:[A-Z]{2})?\s?\d{8,12})"
    )
    .unwrap();
    static ref EORI_RE: Regex =
        Regex::new(r"(?i)EORI\s*(?:No|Number)?[.:\s]*([A-Z]{2}[A-Z0-9]{8,15})").unwrap();
    static ref ESTABLISHED_RE: Regex =
        Regex::new(r"(?i)\b(?:established|est\.?|founded|since)\s*(?:in\s*)?(\d{4})").unwrap();
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn from_patterns(text: &str) -> CompanyRegistration {
    CompanyRegistration {
        company_name: None,
        company_number: capture(&COMPANY_NUMBER_RE, text),
        vat_number: capture(&VAT_RE, text),
        eori_number: capture(&EORI_RE, text),
        established_date: capture(&ESTABLISHED_RE, text),
        country: None,
    }
}

/// Model responses use string placeholders for absence.
fn normalize(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("null")
        {
            None
        } else {
            Some(trimmed)
        }
    })
}

async fn backfill_from_model(
    model: &dyn BaseModelInvoker,
    text: &str,
) -> Result<CompanyRegistration> {
    let clipped: String = text.chars().take(MODEL_REGISTRATION_CLIP).collect();
    let prompt = format!(
        r#"Extract company registration details from the following website text.

{clipped}

Respond with ONLY a JSON object in this exact format, using null for anything not present:
{{
  "company_name": "registered legal name",
  "company_number": "company registration number",
  "vat_number": "VAT number",
  "eori_number": "EORI number",
  "established_date": "year or date the company was established",
  "country": "country of registration"
}}"#
    );

    let messages = vec![
        Message::system("You extract company registration details. Respond only with JSON."),
        Message::user(prompt),
    ];

    let response = model
        .invoke(&messages)
        .await
        .context("registration model call failed")?;

    let raw: CompanyRegistration =
        parse_model_json(&response).context("registration response was not valid JSON")?;

    Ok(CompanyRegistration {
        company_name: normalize(raw.company_name),
        company_number: normalize(raw.company_number),
        vat_number: normalize(raw.vat_number),
        eori_number: normalize(raw.eori_number),
        established_date: normalize(raw.established_date),
        country: normalize(raw.country),
    })
}

/// Extract registration details from site text.
///
/// The model pass is best-effort: a model failure degrades to
/// whatever the patterns found. Returns `None` when nothing at all
/// was extracted.
pub async fn extract_registration(
    model: &dyn BaseModelInvoker,
    text: &str,
) -> Option<CompanyRegistration> {
    let mut registration = from_patterns(text);

    match backfill_from_model(model, text).await {
        Ok(filled) => {
            registration.company_name = registration.company_name.or(filled.company_name);
            registration.company_number = registration.company_number.or(filled.company_number);
            registration.vat_number = registration.vat_number.or(filled.vat_number);
            registration.eori_number = registration.eori_number.or(filled.eori_number);
            registration.established_date =
                registration.established_date.or(filled.established_date);
            registration.country = registration.country.or(filled.country);
        }
        Err(e) => {
            warn!(error = %e, "registration backfill failed, keeping pattern results");
        }
    }

    if registration.is_empty() {
        debug!("no registration details found");
        None
    } else {
        Some(registration)
    }
}
