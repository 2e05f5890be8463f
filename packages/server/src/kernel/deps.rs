//! Server dependencies for effects (using traits for testability)
//!
//! This module provides the central dependency container injected into
//! the job orchestrator and HTTP handlers. All external capabilities
//! sit behind trait objects so tests can swap in stubs.

use std::sync::Arc;

use crate::config::DEFAULT_STREET_VIEW_MIN_IMAGE_BYTES;
use crate::kernel::traits::{
    BaseContentExtractor, BaseFlagScreener, BaseModelInvoker, BaseStreetImagery,
};

/// Capability providers and tunables shared by every job.
///
/// Constructed once at process start and passed by `Arc`; there is no
/// module-level singleton.
#[derive(Clone)]
pub struct ServerDeps {
    pub content_extractor: Arc<dyn BaseContentExtractor>,
    pub model: Arc<dyn BaseModelInvoker>,
    pub flag_screener: Arc<dyn BaseFlagScreener>,
    /// Street-imagery provider; `None` means no credential is
    /// configured and address validation degrades to unknown.
    pub street_imagery: Option<Arc<dyn BaseStreetImagery>>,
    /// Imagery payloads under this size are treated as the provider's
    /// "not found" placeholder rather than a real photo.
    pub street_view_min_image_bytes: usize,
}

impl ServerDeps {
    pub fn new(
        content_extractor: Arc<dyn BaseContentExtractor>,
        model: Arc<dyn BaseModelInvoker>,
        flag_screener: Arc<dyn BaseFlagScreener>,
        street_imagery: Option<Arc<dyn BaseStreetImagery>>,
    ) -> Self {
        Self {
            content_extractor,
            model,
            flag_screener,
            street_imagery,
            street_view_min_image_bytes: DEFAULT_STREET_VIEW_MIN_IMAGE_BYTES,
        }
    }

    pub fn with_street_view_min_image_bytes(mut self, bytes: usize) -> Self {
        self.street_view_min_image_bytes = bytes;
        self
    }
}
