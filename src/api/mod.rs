//! HTTP API exposing the travel agent.
//!
//! One process serves three routes: POST `/query` runs the agent loop,
//! GET `/health` is a liveness probe, GET `/tools` lists the tool catalog.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::agent::Agent;
use crate::config::Config;
use crate::llm::OpenAiClient;
use crate::tools::{self, ToolRegistry};

pub mod routes;
pub mod types;

pub use routes::AppState;

/// Build the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/query", post(routes::query))
        .route("/health", get(routes::health))
        .route("/tools", get(routes::tools))
        .with_state(state)
}

/// Wire up the agent from config and serve the API until shutdown.
///
/// Tool registration and reasoning-client construction happen once here;
/// request handlers only ever read the resulting state.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let http = reqwest::Client::new();

    let mut registry = ToolRegistry::new();
    tools::register_default_tools(&mut registry, &config, &http)?;
    let tools = Arc::new(registry);

    // The reasoning client gets its own HTTP client so the completion
    // deadline does not apply to tool traffic.
    let llm_http = reqwest::Client::builder()
        .timeout(config.llm_timeout)
        .build()?;
    let llm = Arc::new(OpenAiClient::new(
        llm_http,
        config.llm_api_key.clone(),
        config.provider.base_url(),
        config.model_name.clone(),
        &tools.descriptors(),
    ));
    tracing::info!(
        provider = config.provider.as_str(),
        model = %config.model_name,
        "reasoning client ready"
    );

    let agent = Agent::new(llm, tools.clone(), &config);
    let state = Arc::new(AppState { agent, tools });

    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
