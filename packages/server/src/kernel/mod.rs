//! Kernel module - server infrastructure and dependencies.

pub mod content_extractor;
pub mod deps;
pub mod flag_screener;
pub mod jobs;
pub mod model_invoker;
pub mod streetview;
pub mod test_dependencies;
pub mod traits;

pub use content_extractor::HttpContentExtractor;
pub use deps::ServerDeps;
pub use flag_screener::LlmFlagScreener;
pub use model_invoker::ChatModelInvoker;
pub use streetview::StreetViewClient;
pub use traits::{
    BaseContentExtractor, BaseFlagScreener, BaseModelInvoker, BaseStreetImagery, ImageryLookup,
    PlaceLookup, SiteContent,
};
