//! Business analysis pipeline: summary, classification, screening,
//! registration and address extraction, all driven by the worker.

pub mod naics;
pub mod summarizer;
pub mod types;
pub mod worker;

pub use types::{
    AnalysisResult, BusinessSummary, CompanyRegistration, FlagResult, FlagsReport,
    NaicsCandidate, NaicsClassification,
};
pub use worker::submit;
