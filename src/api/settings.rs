use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::models::{ChatSettings, ChatSettingsUpdate};
use crate::retrieval::{self, ServiceMetadata};
use crate::state::AppState;

/// Config response with the API key redacted
#[derive(Serialize)]
pub struct ConfigResponse {
    pub provider: String,
    pub base_url: String,
    pub search_service: String,
    pub has_api_key: bool,
    pub settings: ChatSettings,
}

/// GET /api/config - Current LLM config (key redacted) and chat settings.
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let llm = state.llm_config.read();
    let settings = state.settings.read().clone();
    Json(ConfigResponse {
        provider: llm.provider.clone(),
        base_url: llm.base_url.clone(),
        search_service: state.config.search.service_name.clone(),
        has_api_key: llm.api_key.is_some(),
        settings,
    })
}

/// GET /api/services - The search services the backend exposes, with their
/// search columns. Feeds the service selector; the active service stays
/// whatever `SEARCH_SERVICE_NAME` configured.
pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceMetadata>>, (StatusCode, String)> {
    retrieval::list_services(&state.http_client, &state.config.search)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Service discovery failed: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to list services: {e:#}"),
            )
        })
}

/// PUT /api/config - Update the runtime chat settings.
// base_url is immutable at runtime (set via LLM_BASE_URL env var only)
// to prevent SSRF: an attacker changing it could exfiltrate the API key.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<ChatSettingsUpdate>,
) -> Json<ChatSettings> {
    let mut settings = state.settings.write();

    if let Some(model) = update.model {
        settings.model = model;
    }
    if let Some(n) = update.num_retrieved_chunks {
        settings.num_retrieved_chunks = n.clamp(1, 10);
    }
    if let Some(n) = update.num_chat_messages {
        settings.num_chat_messages = n.clamp(1, 10);
    }
    if let Some(v) = update.use_chat_history {
        settings.use_chat_history = v;
    }
    if let Some(topic) = update.topic {
        // Empty string clears the filter back to all topics
        settings.topic = if topic.is_empty() { None } else { Some(topic) };
    }

    Json(settings.clone())
}
