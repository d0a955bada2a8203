//! The conversational pipeline: prompt construction, history condensing,
//! and turn orchestration.

pub mod controller;
pub mod prompt;
pub mod summarize;
