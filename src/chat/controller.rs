//! Orchestration of one chat turn.
//!
//! Order of operations: append the user message and persist, condense the
//! question against the history window, retrieve context, build the prompt,
//! complete, append the assistant message and persist. A retrieval or
//! completion failure aborts the turn; the user message stays in the
//! transcript (it only shrinks on explicit clear).

use anyhow::Result;

use crate::chat::{prompt, summarize};
use crate::llm::completion;
use crate::models::{ChatMessage, ChatRequest, Role};
use crate::retrieval;
use crate::session;
use crate::state::AppState;

/// Result of a completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutput {
    pub reply: String,
    pub sources: Vec<String>,
    /// Raw retrieval context, kept only when the caller asked for debug
    pub context: Option<String>,
}

pub async fn run_turn(state: &AppState, req: ChatRequest) -> Result<TurnOutput> {
    let question = req.question.trim().to_string();
    anyhow::ensure!(!question.is_empty(), "Question is required");

    let settings = state.settings.read().clone();
    let llm = state.llm_config.read().clone();
    let model = req.model.unwrap_or_else(|| settings.model.clone());
    let topic = req.topic.or_else(|| settings.topic.clone());

    // Step 1: record the user turn before any external call can fail.
    {
        let mut convo = state.conversation.write();
        session::append_message(&state.session_store, &mut convo, Role::User, question.clone())?;
    }

    // Step 2: bounded history window (excludes the question just appended).
    let history: Vec<ChatMessage> = if settings.use_chat_history {
        let convo = state.conversation.read();
        prompt::history_window(&convo.messages, settings.num_chat_messages).to_vec()
    } else {
        Vec::new()
    };
    let history_text = prompt::history_block(&history);

    // Step 3: condense follow-ups into a self-contained query.
    let effective_query = summarize::condense_question(
        &state.http_client,
        &llm,
        &model,
        &history_text,
        &question,
    )
    .await?;
    if effective_query != question {
        tracing::debug!("Condensed question: {effective_query}");
    }

    // Step 4: retrieve context from the external search service.
    let results = retrieval::search(
        &state.http_client,
        &state.config.search,
        &effective_query,
        settings.num_retrieved_chunks,
        topic.as_deref(),
    )
    .await?;
    tracing::info!("Retrieved {} context chunks", results.len());

    // Step 5: build the prompt and complete.
    let context = prompt::context_block(&results);
    let full_prompt = prompt::build_prompt(&history_text, &context, &question);
    let reply = completion::complete(&state.http_client, &llm, &model, &full_prompt).await?;

    // Step 6: record the assistant turn and persist.
    {
        let mut convo = state.conversation.write();
        session::append_message(&state.session_store, &mut convo, Role::Assistant, reply.clone())?;
    }

    Ok(TurnOutput {
        sources: results.into_iter().map(|r| r.source).collect(),
        context: req.debug.then_some(context),
        reply,
    })
}
