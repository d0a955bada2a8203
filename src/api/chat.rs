use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::chat::controller::run_turn;
use crate::chat::summarize;
use crate::models::{ChatRequest, ChatResponse, ConversationState, PinRequest};
use crate::session;
use crate::state::AppState;

/// POST /api/chat - Run one retrieval-augmented chat turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    if req.question.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Question is required".to_string()));
    }

    let output = run_turn(&state, req).await.map_err(|e| {
        tracing::error!("Chat turn failed: {e:#}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Chat turn failed: {e:#}"),
        )
    })?;

    Ok(Json(ChatResponse {
        reply: output.reply,
        sources: output.sources,
        context: output.context,
    }))
}

/// GET /api/session - Current conversation state.
pub async fn get_session(State(state): State<AppState>) -> Json<ConversationState> {
    Json(state.conversation.read().clone())
}

/// POST /api/session/clear - Reset the transcript (pins survive).
pub async fn clear_session(
    State(state): State<AppState>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut convo = state.conversation.write();
    session::clear_messages(&state.session_store, &mut convo).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to clear session: {e:#}"),
        )
    })?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/session/pin - Pin an assistant message by transcript index.
pub async fn pin_message(
    State(state): State<AppState>,
    Json(req): Json<PinRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut convo = state.conversation.write();
    session::pin_message(&state.session_store, &mut convo, req.message_index)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("{e:#}")))?;
    Ok(StatusCode::OK)
}

/// GET /api/session/transcript - Plain-text transcript for download.
pub async fn transcript(State(state): State<AppState>) -> String {
    let convo = state.conversation.read();
    summarize::format_transcript(&convo.messages)
}

/// POST /api/session/summary - Summarize the conversation into bullet points.
pub async fn summary(
    State(state): State<AppState>,
) -> Result<String, (StatusCode, String)> {
    let messages = {
        let convo = state.conversation.read();
        convo.messages.clone()
    };
    if messages.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Nothing to summarize yet".to_string(),
        ));
    }

    let llm = state.llm_config.read().clone();
    let model = state.settings.read().model.clone();
    summarize::transcript_summary(&state.http_client, &llm, &model, &messages)
        .await
        .map_err(|e| {
            tracing::error!("Summary failed: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Summary failed: {e:#}"),
            )
        })
}
