use std::sync::Arc;

use anyhow::{Context, Result};
use llm_client::LlmClient;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use server_core::config::Config;
use server_core::kernel::jobs::JobStore;
use server_core::kernel::{
    BaseStreetImagery, ChatModelInvoker, HttpContentExtractor, LlmFlagScreener, ServerDeps,
    StreetViewClient,
};
use server_core::server::{build_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let mut llm = LlmClient::new(&config.llm_api_key)
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    if let Some(base_url) = &config.llm_base_url {
        llm = llm.with_base_url(base_url);
    }
    let model = Arc::new(ChatModelInvoker::new(llm, &config.llm_model));

    let street_imagery: Option<Arc<dyn BaseStreetImagery>> = match &config.street_view_api_key {
        Some(key) => Some(Arc::new(StreetViewClient::new(key)?)),
        None => {
            info!("no street imagery credential, address validation will degrade");
            None
        }
    };

    let deps = ServerDeps::new(
        Arc::new(HttpContentExtractor::new()?),
        model.clone(),
        Arc::new(LlmFlagScreener::new(model)),
        street_imagery,
    )
    .with_street_view_min_image_bytes(config.street_view_min_image_bytes);

    let state = AppState {
        deps: Arc::new(deps),
        jobs: JobStore::new(),
    };

    let app = build_app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(addr = %addr, model = %config.llm_model, "server listening");

    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}
