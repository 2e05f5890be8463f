//! Shared infrastructure used by kernel and domains.

pub mod json;
pub mod types;

pub use json::{extract_json_object, parse_model_json, JsonExtractError};
pub use types::TriState;
