//! Clients for the external LLM completion capability.

pub mod completion;
