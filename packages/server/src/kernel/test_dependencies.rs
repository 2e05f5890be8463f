//! Stub capability providers for tests.
//!
//! Kept in the main tree (not behind cfg(test)) so integration tests
//! can reach them through the library crate.

use anyhow::Result;
use async_trait::async_trait;
use llm_client::Message;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domains::analysis::types::FlagsReport;

use super::traits::{
    BaseContentExtractor, BaseFlagScreener, BaseModelInvoker, BaseStreetImagery, ImageryLookup,
    PlaceLookup, SiteContent,
};

/// Content extractor returning a fixed bundle, or failing every call.
#[derive(Default)]
pub struct StubContentExtractor {
    pub content: SiteContent,
    pub fail_with: Option<String>,
    calls: AtomicUsize,
}

impl StubContentExtractor {
    pub fn with_content(content: SiteContent) -> Self {
        Self {
            content,
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            content: SiteContent::default(),
            fail_with: Some(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseContentExtractor for StubContentExtractor {
    async fn extract(&self, _url: &str) -> Result<SiteContent> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            anyhow::bail!("{}", message);
        }
        Ok(self.content.clone())
    }
}

/// Model invoker that replays a scripted sequence of responses.
///
/// Errors once the script is exhausted, which makes over-invocation
/// visible as a test failure.
pub struct ScriptedModelInvoker {
    responses: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl ScriptedModelInvoker {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseModelInvoker for ScriptedModelInvoker {
    async fn invoke(&self, _messages: &[Message]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().unwrap();
        responses
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("scripted model invoker exhausted"))
    }
}

/// Flag screener returning a fixed report.
#[derive(Default)]
pub struct StubFlagScreener {
    pub report: FlagsReport,
    calls: AtomicUsize,
}

impl StubFlagScreener {
    pub fn with_report(report: FlagsReport) -> Self {
        Self {
            report,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseFlagScreener for StubFlagScreener {
    async fn screen(&self, _content: &SiteContent) -> Result<FlagsReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.report.clone())
    }
}

/// Street-imagery provider returning canned lookups, or failing every
/// call with a scripted transport error.
pub struct StubStreetImagery {
    pub image_bytes: usize,
    pub types: Vec<String>,
    pub fail_with: Option<String>,
    calls: AtomicUsize,
}

impl StubStreetImagery {
    pub fn new(image_bytes: usize, types: Vec<String>) -> Self {
        Self {
            image_bytes,
            types,
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            image_bytes: 0,
            types: Vec::new(),
            fail_with: Some(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseStreetImagery for StubStreetImagery {
    async fn street_view(&self, _address: &str) -> Result<ImageryLookup> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            anyhow::bail!("{}", message);
        }
        Ok(ImageryLookup {
            status: 200,
            content_length: self.image_bytes,
        })
    }

    async fn place_types(&self, _address: &str) -> Result<PlaceLookup> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            anyhow::bail!("{}", message);
        }
        Ok(PlaceLookup {
            status: 200,
            types: self.types.clone(),
        })
    }
}
