//! Business summary generation from extracted site content.

use anyhow::{Context, Result};
use llm_client::Message;
use tracing::debug;

use crate::common::json::parse_model_json;
use crate::kernel::traits::{BaseModelInvoker, SiteContent};

use super::types::BusinessSummary;

const HOMEPAGE_CLIP: usize = 10_000;
const ABOUT_CLIP: usize = 5_000;
const PRODUCTS_CLIP: usize = 5_000;
const CONTACT_CLIP: usize = 2_000;

fn clip(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn build_prompt(content: &SiteContent) -> String {
    format!(
        r#"Analyze the following website content and summarize the business.

Homepage:
{homepage}

About page:
{about}

Products/services page:
{products}

Contact page:
{contact}

Respond with ONLY a JSON object in this exact format:
{{
  "business_name": "the trading name of the business",
  "description": "2-3 sentence description of what the business does",
  "products_services": ["list", "of", "main products or services"],
  "operating_countries": ["countries the business operates from"],
  "counterparty_countries": ["countries it sells to or sources from"],
  "industry": "the industry sector the business operates in"
}}"#,
        homepage = clip(&content.homepage, HOMEPAGE_CLIP),
        about = clip(&content.about, ABOUT_CLIP),
        products = clip(&content.products, PRODUCTS_CLIP),
        contact = clip(&content.contact, CONTACT_CLIP),
    )
}

/// Ask the model for a structured business summary.
///
/// A malformed response is a hard error: every later stage keys off
/// this summary.
pub async fn summarize(
    model: &dyn BaseModelInvoker,
    content: &SiteContent,
) -> Result<BusinessSummary> {
    let messages = vec![
        Message::system("You are a business analyst. Respond only with JSON."),
        Message::user(build_prompt(content)),
    ];

    let response = model
        .invoke(&messages)
        .await
        .context("summary model call failed")?;

    let summary: BusinessSummary =
        parse_model_json(&response).context("summary response was not valid JSON")?;

    debug!(business_name = %summary.business_name, "summary generated");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_clips_long_sections() {
        let content = SiteContent {
            homepage: "h".repeat(HOMEPAGE_CLIP + 500),
            ..Default::default()
        };
        let prompt = build_prompt(&content);
        let homepage_run = prompt.matches('h').count();
        assert!(homepage_run <= HOMEPAGE_CLIP + 100);
    }
}
