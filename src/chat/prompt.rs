//! Deterministic prompt construction.
//!
//! History and retrieved context are included verbatim; there is no
//! truncation or token budget, so very long inputs produce very long
//! prompts. That limitation is inherited from the design, not handled here.

use std::fmt::Write;

use crate::models::{ChatMessage, RetrievalResult, Role};

/// The bounded history window: at most `count - 1` messages immediately
/// preceding the final one (the question that was just appended for the
/// current turn). A tail slice of `count` messages that stops short of the
/// question, so the window itself holds one fewer.
pub fn history_window(messages: &[ChatMessage], count: usize) -> &[ChatMessage] {
    if messages.len() <= 1 || count <= 1 {
        return &[];
    }
    let end = messages.len() - 1;
    let start = end.saturating_sub(count - 1);
    &messages[start..end]
}

/// Join the user-authored contents of the window into one text block.
pub fn history_block(history: &[ChatMessage]) -> String {
    history
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render retrieved snippets as numbered context entries. Zero results
/// yield an empty block; a result whose snippet column was absent carries
/// the literal placeholder instead.
pub fn context_block(results: &[RetrievalResult]) -> String {
    let mut ctx = String::new();
    for (i, r) in results.iter().enumerate() {
        if i > 0 {
            ctx.push_str("\n\n");
        }
        write!(ctx, "Context {}: {}:\n{}", i + 1, r.source, r.snippet).unwrap();
    }
    ctx
}

/// Compose the full completion payload: instruction preamble, chat history,
/// retrieved context, and the question.
pub fn build_prompt(history_text: &str, context: &str, question: &str) -> String {
    format!(
        "[INST]\n\
         You are IntelliGuide, a helpful AI assistant with access to PDF-based travel brochures.\n\
         Use the provided <context> and <chat_history> to answer user questions.\n\
         Respond clearly, briefly, and helpfully.\n\n\
         <chat_history>{history_text}</chat_history>\n\
         <context>{context}</context>\n\
         <question>{question}</question>\n\
         [/INST]\n\
         Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::MISSING_CHUNK;

    fn msg(role: Role, content: &str) -> ChatMessage {
        ChatMessage {
            role,
            content: content.to_string(),
        }
    }

    fn hit(source: &str, snippet: &str) -> RetrievalResult {
        RetrievalResult {
            source: source.to_string(),
            snippet: snippet.to_string(),
        }
    }

    // ─── History window ──────────────────────────────────

    #[test]
    fn test_window_excludes_current_question() {
        let messages = vec![
            msg(Role::User, "q1"),
            msg(Role::Assistant, "a1"),
            msg(Role::User, "q2"),
        ];
        let window = history_window(&messages, 5);
        assert_eq!(window.len(), 2);
        assert_eq!(window[1].content, "a1");
    }

    #[test]
    fn test_window_bounded_by_count() {
        let messages: Vec<ChatMessage> = (0..12)
            .map(|i| {
                msg(
                    if i % 2 == 0 { Role::User } else { Role::Assistant },
                    &format!("m{i}"),
                )
            })
            .collect();
        let window = history_window(&messages, 3);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].content, "m9");
        assert_eq!(window[1].content, "m10");
    }

    #[test]
    fn test_window_holds_one_fewer_than_count() {
        let messages = vec![
            msg(Role::User, "q1"),
            msg(Role::Assistant, "a1"),
            msg(Role::User, "q2"),
            msg(Role::Assistant, "a2"),
            msg(Role::User, "q3"),
        ];
        let window = history_window(&messages, 3);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].content, "q2");
        assert_eq!(window[1].content, "a2");
    }

    #[test]
    fn test_window_single_message_is_empty() {
        let messages = vec![msg(Role::User, "first question")];
        assert!(history_window(&messages, 5).is_empty());
    }

    #[test]
    fn test_window_count_one_is_empty() {
        let messages = vec![msg(Role::User, "q1"), msg(Role::User, "q2")];
        assert!(history_window(&messages, 1).is_empty());
    }

    // ─── History block ───────────────────────────────────

    #[test]
    fn test_history_block_user_contents_only() {
        let history = vec![
            msg(Role::User, "where is Kyoto"),
            msg(Role::Assistant, "In Japan."),
            msg(Role::User, "how long is the tour"),
        ];
        let block = history_block(&history);
        assert_eq!(block, "where is Kyoto\nhow long is the tour");
    }

    #[test]
    fn test_history_block_empty() {
        assert_eq!(history_block(&[]), "");
    }

    // ─── Context block ───────────────────────────────────

    #[test]
    fn test_context_block_numbered_entries() {
        let results = vec![hit("japan.pdf", "Kyoto and Osaka"), hit("vietnam.pdf", "Hanoi")];
        let ctx = context_block(&results);
        assert!(ctx.starts_with("Context 1: japan.pdf:\nKyoto and Osaka"));
        assert!(ctx.contains("Context 2: vietnam.pdf:\nHanoi"));
    }

    #[test]
    fn test_context_block_empty_results() {
        assert_eq!(context_block(&[]), "");
    }

    #[test]
    fn test_context_block_carries_placeholder() {
        let results = vec![hit("a.pdf", MISSING_CHUNK)];
        let ctx = context_block(&results);
        assert!(ctx.contains(MISSING_CHUNK));
    }

    // ─── Full prompt ─────────────────────────────────────

    #[test]
    fn test_prompt_contains_all_sections() {
        let prompt = build_prompt("prior question", "Context 1: a.pdf:\ntext", "new question");
        assert!(prompt.contains("<chat_history>prior question</chat_history>"));
        assert!(prompt.contains("<context>Context 1: a.pdf:\ntext</context>"));
        assert!(prompt.contains("<question>new question</question>"));
        assert!(prompt.trim_end().ends_with("Answer:"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_prompt("h", "c", "q");
        let b = build_prompt("h", "c", "q");
        assert_eq!(a, b);
    }
}
