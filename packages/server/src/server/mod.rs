//! HTTP layer: router construction and request handlers.

pub mod app;
pub mod routes;

pub use app::{build_app, AppState};
