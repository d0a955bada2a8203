//! PDF text extraction and fixed-heuristic brochure metadata.

pub mod extract;
pub mod meta;
