use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a chat turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Display label used in transcripts ("User" / "Assistant")
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// A single chat turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// The whole persisted conversation: the ordered transcript plus the
/// separately retained pinned responses. Serialized wholesale to the
/// session file after every mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationState {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub pinned_messages: Vec<String>,
}

/// One ranked snippet returned by the external search service. Transient;
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Source document identifier (relative path within the index)
    pub source: String,
    /// Snippet text pulled from the configured search column
    pub snippet: String,
}

/// A scraped tour record. Loaded from a JSON array file, edited in place,
/// written back wholesale on save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TourRecord {
    pub trip_name: String,
    pub trip_code: String,
    pub region: String,
    pub country: String,
    #[serde(default)]
    pub description: String,
    pub original_url: String,
    #[serde(default)]
    pub booking_url: String,
    #[serde(default)]
    pub trip_inclusions: Vec<String>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub price_aud: String,
    #[serde(default)]
    pub limited_availability: bool,
    #[serde(default)]
    pub scraped_at: Option<DateTime<Utc>>,
}

/// Chat request
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    /// Override the configured completion model for this turn
    pub model: Option<String>,
    /// Restrict retrieval to one topic/region
    pub topic: Option<String>,
    /// Include the raw retrieval context in the response
    #[serde(default)]
    pub debug: bool,
}

/// Chat response
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    /// Source identifiers of the retrieved snippets
    pub sources: Vec<String>,
    /// Raw retrieval context, present only when debug was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Pin request: index of an assistant message in the transcript
#[derive(Debug, Clone, Deserialize)]
pub struct PinRequest {
    pub message_index: usize,
}

/// Runtime-tunable chat settings (the original sidebar controls)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Completion model name
    pub model: String,
    /// Number of context chunks to retrieve (1..=10)
    pub num_retrieved_chunks: usize,
    /// History window size in messages (1..=10)
    pub num_chat_messages: usize,
    /// Whether to condense follow-up questions with prior turns
    pub use_chat_history: bool,
    /// Topic filter applied to retrieval; None means all topics
    pub topic: Option<String>,
}

impl ChatSettings {
    pub fn from_model(model: String) -> Self {
        Self {
            model,
            num_retrieved_chunks: 5,
            num_chat_messages: 5,
            use_chat_history: true,
            topic: None,
        }
    }
}

/// Partial settings update
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSettingsUpdate {
    pub model: Option<String>,
    pub num_retrieved_chunks: Option<usize>,
    pub num_chat_messages: Option<usize>,
    pub use_chat_history: Option<bool>,
    /// Some("") clears the topic filter
    pub topic: Option<String>,
}

/// One brochure card in the library listing
#[derive(Debug, Clone, Serialize)]
pub struct BrochureCard {
    pub file_name: String,
    pub title: String,
    pub code: String,
    pub days: String,
    pub route: String,
    pub tags: Vec<String>,
}

/// Brochure library page
#[derive(Debug, Clone, Serialize)]
pub struct BrochurePage {
    pub brochures: Vec<BrochureCard>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

/// Upload response
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub file_name: String,
    pub pages_extracted: usize,
    pub staged_path: String,
    pub index_rebuilt: bool,
}

/// Tour record update: the fields editable through the viewer
#[derive(Debug, Clone, Deserialize)]
pub struct TourUpdate {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub price_aud: Option<String>,
    pub limited_availability: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_to_snake_case() {
        let json = serde_json::to_value(Role::Assistant).unwrap();
        assert_eq!(json, "assistant");
    }

    #[test]
    fn test_conversation_state_wire_format() {
        let state = ConversationState {
            messages: vec![ChatMessage {
                role: Role::User,
                content: "hi".into(),
            }],
            pinned_messages: vec!["pinned".into()],
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
        assert_eq!(json["pinned_messages"][0], "pinned");
    }

    #[test]
    fn test_conversation_state_missing_fields_default_empty() {
        let state: ConversationState = serde_json::from_str("{}").unwrap();
        assert!(state.messages.is_empty());
        assert!(state.pinned_messages.is_empty());
    }

    #[test]
    fn test_tour_record_tolerates_sparse_json() {
        let json = r#"{
            "trip_name": "Enchanting Japan",
            "trip_code": "JP2025",
            "region": "Asia",
            "country": "Japan",
            "original_url": "https://example.com/tours/asia/japan/jp2025"
        }"#;
        let record: TourRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.trip_code, "JP2025");
        assert!(record.trip_inclusions.is_empty());
        assert!(!record.limited_availability);
    }
}
