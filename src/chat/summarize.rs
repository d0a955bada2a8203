//! LLM-backed rewriting of follow-up questions and whole-transcript
//! summaries. Both delegate to the completion capability with fixed
//! instruction templates.

use anyhow::Result;

use crate::config::LlmConfig;
use crate::llm::completion;
use crate::models::ChatMessage;

/// Rewrite a follow-up question into a self-contained query using the prior
/// user turns. The passthrough is keyed on the user-authored history text,
/// not the raw window: a window holding only assistant turns also passes
/// through, since the condense template only ever sees user questions. On
/// passthrough no completion call is made.
pub async fn condense_question(
    client: &reqwest::Client,
    config: &LlmConfig,
    model: &str,
    history_text: &str,
    question: &str,
) -> Result<String> {
    if history_text.trim().is_empty() {
        return Ok(question.to_string());
    }

    let prompt = condense_prompt(history_text, question);
    completion::complete(client, config, model, &prompt).await
}

fn condense_prompt(history_text: &str, question: &str) -> String {
    format!(
        "[INST]\n\
         Extend the user question using the chat history.\n\
         <chat_history>{history_text}</chat_history>\n\
         <question>{question}</question>\n\
         [/INST]"
    )
}

/// Render the transcript as labelled lines ("User: ..." / "Assistant: ...").
pub fn format_transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.label(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Summarize the whole conversation into key bullet points.
pub async fn transcript_summary(
    client: &reqwest::Client,
    config: &LlmConfig,
    model: &str,
    messages: &[ChatMessage],
) -> Result<String> {
    let formatted = format_transcript(messages);
    let prompt = format!(
        "[INST]\n\
         You are an expert summarizer. Summarize the following chat conversation into \
         5-7 key bullet points that capture the main ideas and solutions shared by the \
         assistant. Be concise, and do not repeat.\n\
         <chat_history>\n{formatted}\n</chat_history>\n\
         Your output should look like:\n\
         - Point 1\n\
         - Point 2\n\
         ...\n\
         [/INST]"
    );
    let summary = completion::complete(client, config, model, &prompt).await?;
    Ok(summary.trim().to_string())
}
