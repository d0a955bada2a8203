use axum::routing::{get, post, put};
use axum::Router;
use tracing_subscriber::EnvFilter;

use intelliguide::api;
use intelliguide::config::Config;
use intelliguide::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!("Brochure directory: {}", config.brochure_dir.display());
    tracing::info!("Search service: {} ({})", config.search.service_name, config.search.base_url);
    tracing::info!("LLM provider: {} ({})", config.llm.provider, config.llm.base_url);

    let state = AppState::new(config.clone())?;

    // No CORS layer: clients are same-origin tools, so cross-origin access is
    // unnecessary. This prevents drive-by attacks from malicious pages.
    let app = Router::new()
        .route("/api/chat", post(api::chat::chat))
        .route("/api/session", get(api::chat::get_session))
        .route("/api/session/clear", post(api::chat::clear_session))
        .route("/api/session/pin", post(api::chat::pin_message))
        .route("/api/session/transcript", get(api::chat::transcript))
        .route("/api/session/summary", post(api::chat::summary))
        .route("/api/upload", post(api::upload::upload))
        .route("/api/brochures", get(api::brochures::list_brochures))
        .route("/api/tours", get(api::tours::list_tours))
        .route("/api/tours/{code}", put(api::tours::update_tour))
        .route("/api/services", get(api::settings::list_services))
        .route("/api/config", get(api::settings::get_config))
        .route("/api/config", put(api::settings::update_settings))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
