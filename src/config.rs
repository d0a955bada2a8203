use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where sessions, staged uploads, and scraped artifacts are stored
    pub data_dir: PathBuf,
    /// Directory of locally stored brochure PDFs (the browse/preview library)
    pub brochure_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// Identifier of the active conversation session
    pub session_id: String,
    /// External document search / indexing service
    pub search: SearchConfig,
    /// LLM completion provider configuration
    pub llm: LlmConfig,
}

/// Configuration for the external search service that holds the brochure
/// index. Search ranking and index maintenance are entirely the service's
/// concern; this side only issues queries and rebuild requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the search service API
    pub base_url: String,
    /// Name of the search service/index to query
    pub service_name: String,
    /// Result column that carries the snippet text
    pub search_column: String,
    /// Default number of chunks to retrieve per query (1..=10)
    pub num_chunks: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for chat completion
    pub chat_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            brochure_dir: PathBuf::from("./pdfs"),
            bind_addr: "127.0.0.1:9000".to_string(),
            session_id: "default".to_string(),
            search: SearchConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8061".to_string(),
            service_name: "apt_pdf".to_string(),
            search_column: "chunk".to_string(),
            num_chunks: 5,
            timeout_secs: 30,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            chat_model: "llama3.1-8b".to_string(),
            api_key: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("INTELLIGUIDE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("INTELLIGUIDE_BROCHURE_DIR") {
            config.brochure_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("INTELLIGUIDE_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(id) = std::env::var("INTELLIGUIDE_SESSION_ID") {
            config.session_id = id;
        }

        if let Ok(url) = std::env::var("SEARCH_BASE_URL") {
            config.search.base_url = url;
        }
        if let Ok(name) = std::env::var("SEARCH_SERVICE_NAME") {
            config.search.service_name = name;
        }
        if let Ok(col) = std::env::var("SEARCH_COLUMN") {
            config.search.search_column = col;
        }
        if let Ok(val) = std::env::var("SEARCH_NUM_CHUNKS") {
            if let Ok(v) = val.parse::<usize>() {
                config.search.num_chunks = v.clamp(1, 10);
            }
        }
        if let Ok(val) = std::env::var("SEARCH_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.search.timeout_secs = v;
            }
        }

        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }

        config
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.data_dir.join("sessions")
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.data_dir.join("staging")
    }

    pub fn session_path(&self) -> PathBuf {
        self.sessions_dir()
            .join(format!("{}.json", self.session_id))
    }

    pub fn tours_path(&self) -> PathBuf {
        self.data_dir.join("tour_info.json")
    }
}
