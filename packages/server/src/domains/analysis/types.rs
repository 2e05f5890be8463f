//! Result types produced by the analysis pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::types::TriState;

/// Model-written summary of what the business does.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessSummary {
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub products_services: Vec<String>,
    #[serde(default)]
    pub operating_countries: Vec<String>,
    #[serde(default)]
    pub counterparty_countries: Vec<String>,
    #[serde(default)]
    pub industry: String,
}

/// One candidate NAICS code with its confidence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NaicsCandidate {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub confidence: String,
}

/// NAICS industry classification derived from the summary: every
/// plausible candidate, plus the one the model settled on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NaicsClassification {
    #[serde(default)]
    pub candidates: Vec<NaicsCandidate>,
    #[serde(default)]
    pub primary: NaicsCandidate,
    #[serde(default)]
    pub reasoning: String,
}

/// Screening outcome for one risk category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlagResult {
    #[serde(default)]
    pub flags_raised: bool,
    #[serde(default)]
    pub matches: Vec<String>,
    #[serde(default)]
    pub evidence: Vec<String>,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub risk_score: u8,
    #[serde(default)]
    pub risk_explanation: String,
}

/// Combined screening report across all risk categories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlagsReport {
    #[serde(default)]
    pub sanctions: FlagResult,
    #[serde(default)]
    pub military: FlagResult,
    #[serde(default)]
    pub dual_use: FlagResult,
    #[serde(default)]
    pub any_flags: bool,
}

/// Company registration identifiers pulled from site text.
///
/// Regex hits take precedence; the model only backfills fields the
/// patterns missed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyRegistration {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_number: Option<String>,
    #[serde(default)]
    pub vat_number: Option<String>,
    #[serde(default)]
    pub eori_number: Option<String>,
    #[serde(default)]
    pub established_date: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl CompanyRegistration {
    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    /// Number of populated fields, for log lines.
    pub fn field_count(&self) -> usize {
        [
            self.company_name.is_some(),
            self.company_number.is_some(),
            self.vat_number.is_some(),
            self.eori_number.is_some(),
            self.established_date.is_some(),
            self.country.is_some(),
        ]
        .iter()
        .filter(|populated| **populated)
        .count()
    }
}

/// Verdicts from validating an extracted address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressValidation {
    /// Does street-level imagery exist for this address?
    pub valid: TriState,
    /// Does the address read as a commercial premises?
    pub is_commercial: TriState,
    /// Does the address make sense for this kind of business?
    /// `None` when no address was found to judge.
    pub makes_sense: Option<bool>,
    #[serde(default)]
    pub place_types: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    /// Which strategy produced the commercial verdict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Extracted address plus its validation verdicts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressReport {
    pub address: Option<String>,
    /// Which cascade strategy found the address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_method: Option<String>,
    pub validation: AddressValidation,
}

/// Full output of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub summary: BusinessSummary,
    pub naics: NaicsClassification,
    pub flags: FlagsReport,
    pub address: AddressReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_registration: Option<CompanyRegistration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_empty() {
        assert!(CompanyRegistration::default().is_empty());
        let reg = CompanyRegistration {
            vat_number: Some("GB123456789".into()),
            ..Default::default()
        };
        assert!(!reg.is_empty());
        assert_eq!(reg.field_count(), 1);
    }

    #[test]
    fn flag_result_tolerates_sparse_json() {
        let result: FlagResult = serde_json::from_str(r#"{"flags_raised": true}"#).unwrap();
        assert!(result.flags_raised);
        assert!(result.matches.is_empty());
        assert_eq!(result.risk_score, 0);
    }

    #[test]
    fn validation_serializes_tristate_as_nullable_bool() {
        let validation = AddressValidation {
            valid: TriState::Confirmed,
            is_commercial: TriState::Unknown,
            ..Default::default()
        };
        let json = serde_json::to_value(&validation).unwrap();
        assert_eq!(json["valid"], serde_json::json!(true));
        assert_eq!(json["is_commercial"], serde_json::Value::Null);
    }
}
