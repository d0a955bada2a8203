use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::{Config, LlmConfig};
use crate::models::{ChatSettings, ConversationState};
use crate::session::SessionStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session_store: SessionStore,
    pub conversation: Arc<RwLock<ConversationState>>,
    pub settings: Arc<RwLock<ChatSettings>>,
    pub http_client: reqwest::Client,
    pub llm_config: Arc<RwLock<LlmConfig>>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        // Ensure data directories exist
        std::fs::create_dir_all(config.sessions_dir())?;
        std::fs::create_dir_all(config.staging_dir())?;

        let session_store = SessionStore::new(config.session_path());
        let conversation = session_store.load();
        if !conversation.messages.is_empty() {
            tracing::info!(
                "Restored session '{}' with {} messages",
                config.session_id,
                conversation.messages.len()
            );
        }

        let settings = ChatSettings::from_model(config.llm.chat_model.clone());
        let llm_config = config.llm.clone();

        Ok(Self {
            config,
            session_store,
            conversation: Arc::new(RwLock::new(conversation)),
            settings: Arc::new(RwLock::new(settings)),
            http_client: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            llm_config: Arc::new(RwLock::new(llm_config)),
        })
    }
}
