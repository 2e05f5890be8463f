//! NAICS industry classification.

use anyhow::{Context, Result};
use llm_client::Message;
use tracing::debug;

use crate::common::json::parse_model_json;
use crate::kernel::traits::BaseModelInvoker;

use super::types::{BusinessSummary, NaicsClassification};

fn build_prompt(summary: &BusinessSummary) -> String {
    format!(
        r#"Classify the following business into NAICS codes.

Business name: {name}
Description: {description}
Products/services: {products}
Operating countries: {operating}
Industry: {industry}

Respond with ONLY a JSON object in this exact format:
{{
  "candidates": [
    {{"code": "6-digit NAICS code", "title": "official NAICS title", "confidence": "high, medium, or low"}}
  ],
  "primary": {{"code": "the best single code", "title": "its title", "confidence": "high, medium, or low"}},
  "reasoning": "1-2 sentences explaining the primary classification"
}}"#,
        name = summary.business_name,
        description = summary.description,
        products = summary.products_services.join(", "),
        operating = summary.operating_countries.join(", "),
        industry = summary.industry,
    )
}

/// Classify a business summary into a NAICS code.
pub async fn classify(
    model: &dyn BaseModelInvoker,
    summary: &BusinessSummary,
) -> Result<NaicsClassification> {
    let messages = vec![
        Message::system("You are an industry classification expert. Respond only with JSON."),
        Message::user(build_prompt(summary)),
    ];

    let response = model
        .invoke(&messages)
        .await
        .context("classification model call failed")?;

    let classification: NaicsClassification =
        parse_model_json(&response).context("classification response was not valid JSON")?;

    debug!(
        code = %classification.primary.code,
        confidence = %classification.primary.confidence,
        candidates = classification.candidates.len(),
        "business classified"
    );
    Ok(classification)
}
