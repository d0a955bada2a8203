//! # intelliguide
//!
//! A Rust web application providing retrieval-augmented chat over PDF travel
//! brochures. Document chunking, indexing, search ranking, and language-model
//! completion are delegated to external hosted services; this crate owns the
//! conversational pipeline that glues them together:
//!
//! ```text
//!      question
//!         │
//!         ▼
//!   ┌───────────────┐  history window  ┌───────────────────┐
//!   │ Chat controller│────────────────▶│ History condenser  │
//!   │  (api::chat)   │◀────────────────│  (LLM rewrite)     │
//!   └──────┬────────┘ self-contained q └───────────────────┘
//!          │
//!          ▼
//!   ┌───────────────┐          ┌───────────────────┐
//!   │Retrieval client│─────────▶│ External search svc│
//!   └──────┬────────┘  chunks  └───────────────────┘
//!          │
//!          ▼
//!   ┌───────────────┐          ┌───────────────────┐
//!   │ Prompt builder │─────────▶│ Completion service │
//!   └──────┬────────┘  prompt  └───────────────────┘
//!          │ reply
//!          ▼
//!   append assistant message + persist session
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, data dirs, and external services
//! - [`models`] - Shared data types: `ChatMessage`, `ConversationState`, `TourRecord`, request/response types
//! - [`session`] - File-backed conversation persistence with atomic replace
//! - [`retrieval`] - Client for the external document search / index-rebuild service
//! - [`llm`] - Non-streaming chat completion via Ollama or OpenAI-compatible APIs
//! - [`chat`] - Prompt construction, history condensing, and turn orchestration
//! - [`pdf`] - Per-page text extraction and regex-based brochure metadata
//! - [`scrape`] - Headless-browser tour scraping and fleet-page PDF rendering
//! - [`api`] - Axum HTTP handlers for chat, session, upload, brochures, and tours
//! - [`state`] - Shared application state holding settings, session, and HTTP client

pub mod api;
pub mod chat;
pub mod config;
pub mod llm;
pub mod models;
pub mod pdf;
pub mod retrieval;
pub mod scrape;
pub mod session;
pub mod state;
