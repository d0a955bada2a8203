//! Axum HTTP handlers.

pub mod brochures;
pub mod chat;
pub mod settings;
pub mod tours;
pub mod upload;
