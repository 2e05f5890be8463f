// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (prompts, cascades, validation policy) lives in the
// domain layers and consumes these through ServerDeps.
//
// Naming convention: Base* for trait names (e.g., BaseModelInvoker)

use anyhow::Result;
use async_trait::async_trait;
use llm_client::Message;
use serde::{Deserialize, Serialize};

/// Upper bound on each content section handed to downstream stages.
pub const MAX_SECTION_CHARS: usize = 50_000;

/// Content bundle extracted from a website.
///
/// Each section is a plain-text blob; empty string when the sub-page
/// was not found. Sections are capped at [`MAX_SECTION_CHARS`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteContent {
    pub homepage: String,
    pub about: String,
    pub contact: String,
    pub products: String,
}

impl SiteContent {
    /// Concatenate sections for general extraction (homepage first).
    pub fn combined(&self) -> String {
        format!("{} {} {}", self.homepage, self.about, self.contact)
    }

    /// Concatenate sections for address extraction. Contact pages are
    /// the richest address source, so they lead.
    pub fn combined_for_address(&self) -> String {
        format!("{} {} {}", self.contact, self.about, self.homepage)
    }
}

// =============================================================================
// Content Extractor Trait (Infrastructure - website fetching)
// =============================================================================

#[async_trait]
pub trait BaseContentExtractor: Send + Sync {
    /// Fetch a website and extract its content bundle.
    ///
    /// Sub-page failures degrade to empty sections; only a failure to
    /// fetch the homepage itself is an error.
    async fn extract(&self, url: &str) -> Result<SiteContent>;
}

// =============================================================================
// Model Invoker Trait (Infrastructure - generic LLM capability)
// =============================================================================

#[async_trait]
pub trait BaseModelInvoker: Send + Sync {
    /// Run a chat-style conversation and return the raw text response.
    ///
    /// Callers own all response-shape validation, including JSON
    /// recovery from decorated text (see `common::json`).
    async fn invoke(&self, messages: &[Message]) -> Result<String>;
}

// =============================================================================
// Flag Screener Trait (Infrastructure - compliance risk screening)
// =============================================================================

use crate::domains::analysis::types::FlagsReport;

#[async_trait]
pub trait BaseFlagScreener: Send + Sync {
    /// Screen site content for sanctions, military, and dual-use risk.
    async fn screen(&self, content: &SiteContent) -> Result<FlagsReport>;
}

// =============================================================================
// Street Imagery Trait (Infrastructure - geocoding provider)
// =============================================================================

/// Result of a street-imagery lookup: HTTP-style status plus payload
/// size. The caller decides what size counts as a real photo.
#[derive(Debug, Clone, Copy)]
pub struct ImageryLookup {
    pub status: u16,
    pub content_length: usize,
}

/// Result of a place text-search lookup.
#[derive(Debug, Clone)]
pub struct PlaceLookup {
    pub status: u16,
    pub types: Vec<String>,
}

#[async_trait]
pub trait BaseStreetImagery: Send + Sync {
    /// Look up street-level imagery for an address string.
    async fn street_view(&self, address: &str) -> Result<ImageryLookup>;

    /// Look up place-type tags for an address string.
    async fn place_types(&self, address: &str) -> Result<PlaceLookup>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_for_address_leads_with_contact() {
        let content = SiteContent {
            homepage: "home".into(),
            about: "about".into(),
            contact: "contact".into(),
            products: "products".into(),
        };
        let combined = content.combined_for_address();
        assert!(combined.starts_with("contact"));
        assert!(combined.ends_with("home"));
    }
}
