use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::jobs::JobStore;
use crate::kernel::ServerDeps;

use super::routes;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    pub jobs: Arc<JobStore>,
}

/// Build the application router with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(routes::analysis::submit_analysis))
        .route("/status/:job_id", get(routes::analysis::job_status))
        .route("/results/:job_id", get(routes::analysis::job_results))
        .route("/health", get(routes::health::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                // Covers the handlers only; background jobs keep running.
                .layer(TimeoutLayer::new(Duration::from_secs(30))),
        )
        .layer(Extension(state))
}
