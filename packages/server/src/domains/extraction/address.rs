//! Physical address extraction.
//!
//! Two strategies behind a [`Cascade`]: a regex pass over the raw
//! text, then a model extraction. Both funnel through
//! [`looks_like_address`], which weeds out the e-commerce noise that
//! dominates retail sites ("Add to Basket", prices, wishlists).

use anyhow::{Context, Result};
use async_trait::async_trait;
use lazy_static::lazy_static;
use llm_client::Message;
use regex::Regex;
use std::sync::Arc;

use crate::kernel::traits::BaseModelInvoker;

use super::cascade::{Cascade, ResolverStrategy};

/// Characters of site text included in the model extraction prompt.
const MODEL_ADDRESS_CLIP: usize = 5_000;

lazy_static! {
    static ref STREET_RE: Regex = Regex::new(
        r"(?i)\b(Street|St|Road|Rd|Avenue|Ave|Lane|Ln|Drive|Dr|Way|Boulevard|Blvd|Close|Cl|Crescent|Cres|Place|Pl|Square|Sq)\b"
    )
    .unwrap();
    static ref POSTAL_RE: Regex =
        Regex::new(r"\b[A-Z]{1,2}\d{1,2}\s?\d[A-Z]{2}\b|\b\d{5}(-\d{4})?\b").unwrap();
    static ref NUMBER_RE: Regex = Regex::new(r"\d").unwrap();
    static ref ADDRESS_PATTERNS: Vec<Regex> = vec![
        // "Unit 4, Riverside Industrial Estate, 12 Mill Lane, ..."
        Regex::new(r"(?i)\b(?:unit|suite|building|block)\s+\d+[^.;\n]{0,120}").unwrap(),
        // "123 Main Street, Springfield, ..."
        Regex::new(
            r"\d{1,5}[A-Za-z]?\s+[A-Z][\w\s,']{0,80}?\b(?:Street|St|Road|Rd|Avenue|Ave|Lane|Ln|Drive|Dr|Way|Boulevard|Blvd|Close|Crescent|Place|Square)\b[^.;\n]{0,80}"
        )
        .unwrap(),
    ];
}

/// Storefront phrases that regularly masquerade as addresses.
const ECOMMERCE_TERMS: &[&str] = &[
    "add to basket",
    "add to cart",
    "add to bag",
    "best sellers",
    "wishlist",
    "buy now",
    "checkout",
    "shopping cart",
    "price",
    "£",
    "$",
    "€",
    "shop now",
    "view cart",
];

/// Gate every candidate through the same plausibility checks:
/// no storefront phrases, a street or postal token, at least one
/// numeral, and at least four words.
pub fn looks_like_address(candidate: &str) -> bool {
    let lowered = candidate.to_lowercase();
    if ECOMMERCE_TERMS.iter().any(|term| lowered.contains(term)) {
        return false;
    }

    let has_location_token =
        STREET_RE.is_match(candidate) || POSTAL_RE.is_match(candidate);
    let has_number = NUMBER_RE.is_match(candidate);
    let enough_words = candidate.split_whitespace().count() >= 4;

    has_location_token && has_number && enough_words
}

fn tidy(candidate: &str) -> String {
    candidate.trim().trim_end_matches([',', ' ']).to_string()
}

/// Cut a raw pattern match off after its last postal-code token, so
/// trailing page text ("or call us", opening hours) is not swept into
/// the address.
fn trim_after_postal(candidate: &str) -> &str {
    match POSTAL_RE.find_iter(candidate).last() {
        Some(m) => &candidate[..m.end()],
        None => candidate,
    }
}

/// Regex scan over the raw text.
pub struct PatternAddressStrategy;

#[async_trait]
impl ResolverStrategy<String> for PatternAddressStrategy {
    fn method(&self) -> &'static str {
        "pattern"
    }

    async fn attempt(&self, text: &str) -> Result<Option<String>> {
        for pattern in ADDRESS_PATTERNS.iter() {
            for m in pattern.find_iter(text) {
                let candidate = tidy(trim_after_postal(m.as_str()));
                if looks_like_address(&candidate) {
                    return Ok(Some(candidate));
                }
            }
        }
        Ok(None)
    }
}

/// Model extraction over a clipped slice of the text.
pub struct ModelAddressStrategy {
    model: Arc<dyn BaseModelInvoker>,
}

impl ModelAddressStrategy {
    pub fn new(model: Arc<dyn BaseModelInvoker>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl ResolverStrategy<String> for ModelAddressStrategy {
    fn method(&self) -> &'static str {
        "model"
    }

    async fn attempt(&self, text: &str) -> Result<Option<String>> {
        let clipped: String = text.chars().take(MODEL_ADDRESS_CLIP).collect();
        let prompt = format!(
            r#"Extract the physical business address from the following website text.

{clipped}

Respond with ONLY the full postal address on a single line. If no physical address is present, respond with exactly: none"#
        );

        let messages = vec![
            Message::system("You extract postal addresses from text. Respond with the address only."),
            Message::user(prompt),
        ];

        let response = self
            .model
            .invoke(&messages)
            .await
            .context("address model call failed")?;

        let candidate = tidy(response.trim().trim_matches(['"', '\'']));
        if candidate.eq_ignore_ascii_case("none")
            || candidate.len() <= 10
            || !looks_like_address(&candidate)
        {
            return Ok(None);
        }
        Ok(Some(candidate))
    }
}

/// Build the address cascade: patterns first, model as fallback.
pub fn address_cascade(model: Arc<dyn BaseModelInvoker>) -> Cascade<String> {
    Cascade::new(
        "address",
        vec![
            Box::new(PatternAddressStrategy),
            Box::new(ModelAddressStrategy::new(model)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_uk_industrial_address() {
        assert!(looks_like_address(
            "Unit 4, Riverside Industrial Estate, 12 Mill Lane, Leeds, LS10 1AB"
        ));
    }

    #[test]
    fn accepts_us_street_address() {
        assert!(looks_like_address("123 Main Street, Springfield, IL 62704"));
    }

    #[test]
    fn rejects_ecommerce_noise() {
        assert!(!looks_like_address(
            "Add to Basket - 12 Mill Lane Scented Candle, RRP 14.99"
        ));
        assert!(!looks_like_address("Buy now: 3 for 2 on Oxford Street range"));
    }

    #[test]
    fn rejects_short_or_numberless_candidates() {
        assert!(!looks_like_address("Mill Lane"));
        assert!(!looks_like_address("Our office is on the high street nearby"));
    }

    #[tokio::test]
    async fn pattern_strategy_finds_unit_address() {
        let text = "Visit us at Unit 4, Riverside Industrial Estate, 12 Mill Lane, Leeds, LS10 1AB. Opening hours vary.";
        let found = PatternAddressStrategy.attempt(text).await.unwrap();
        let address = found.unwrap();
        assert!(address.starts_with("Unit 4"));
        assert!(address.contains("Mill Lane"));
    }

    #[tokio::test]
    async fn pattern_strategy_trims_text_after_postal_code() {
        let text = "Find us at 123 Main Street, Springfield, IL 62704 or call us any time.";
        let found = PatternAddressStrategy.attempt(text).await.unwrap();
        assert_eq!(
            found.as_deref(),
            Some("123 Main Street, Springfield, IL 62704")
        );
    }

    #[tokio::test]
    async fn pattern_strategy_skips_storefront_text() {
        let text = "Add to Basket Unit 4 bundle for 9.99, best sellers this week";
        let found = PatternAddressStrategy.attempt(text).await.unwrap();
        assert!(found.is_none());
    }
}
