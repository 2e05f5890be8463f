//! LLM-backed compliance flag screener.
//!
//! One model invocation screens the site content for all three risk
//! categories at once: sanctions exposure, military links, and
//! dual-use goods.

use anyhow::{Context, Result};
use async_trait::async_trait;
use llm_client::Message;
use std::sync::Arc;
use tracing::debug;

use crate::common::json::parse_model_json;
use crate::domains::analysis::types::FlagsReport;

use super::traits::{BaseFlagScreener, BaseModelInvoker, SiteContent};

/// Characters of combined site text included in the screening prompt.
const MAX_SCREEN_CHARS: usize = 10_000;

pub struct LlmFlagScreener {
    model: Arc<dyn BaseModelInvoker>,
}

impl LlmFlagScreener {
    pub fn new(model: Arc<dyn BaseModelInvoker>) -> Self {
        Self { model }
    }

    fn build_prompt(content: &SiteContent) -> String {
        let combined = content.combined();
        let clipped: String = combined.chars().take(MAX_SCREEN_CHARS).collect();

        format!(
            r#"You are a trade compliance analyst. Review the following website content and screen the business for three risk categories:

1. sanctions: any mention of sanctioned entities, countries, or individuals
2. military: links to military, defense, or weapons customers or products
3. dual_use: goods or technology with both civilian and military applications

Website content:
{clipped}

Respond with ONLY a JSON object in this exact format:
{{
  "sanctions": {{"flags_raised": false, "matches": [], "evidence": [], "risk_level": "low", "risk_score": 0, "risk_explanation": ""}},
  "military": {{"flags_raised": false, "matches": [], "evidence": [], "risk_level": "low", "risk_score": 0, "risk_explanation": ""}},
  "dual_use": {{"flags_raised": false, "matches": [], "evidence": [], "risk_level": "low", "risk_score": 0, "risk_explanation": ""}}
}}

Set flags_raised to true only when the content contains concrete evidence. risk_level is one of "low", "medium", "high". risk_score is 0-100."#
        )
    }
}

#[async_trait]
impl BaseFlagScreener for LlmFlagScreener {
    async fn screen(&self, content: &SiteContent) -> Result<FlagsReport> {
        let prompt = Self::build_prompt(content);
        let messages = vec![
            Message::system("You are a precise trade compliance analyst. Respond only with JSON."),
            Message::user(prompt),
        ];

        let response = self
            .model
            .invoke(&messages)
            .await
            .context("flag screening model call failed")?;

        let mut report: FlagsReport =
            parse_model_json(&response).context("flag screening returned malformed JSON")?;
        report.any_flags = report.sanctions.flags_raised
            || report.military.flags_raised
            || report.dual_use.flags_raised;

        debug!(
            any_flags = report.any_flags,
            sanctions = report.sanctions.flags_raised,
            military = report.military.flags_raised,
            dual_use = report.dual_use.flags_raised,
            "flag screening complete"
        );

        Ok(report)
    }
}
