//! Fixed-heuristic metadata extraction for brochure cover text.
//!
//! A pure function: regular expressions recover a tour code, a duration
//! phrase, and an "X to Y" route phrase from the raw text of a brochure's
//! first pages; topic tags come from case-insensitive substring matches
//! against a fixed vocabulary. Unmatched fields default to "N/A" and the
//! tag list to ["General"].

use regex::Regex;
use std::sync::LazyLock;

/// Default value for fields no pattern matched.
pub const NOT_AVAILABLE: &str = "N/A";

/// Fixed topic vocabulary, matched case-insensitively as substrings.
pub const TAG_VOCABULARY: &[&str] = &[
    "Ocean Cruise",
    "River Cruise",
    "Land Tour",
    "4WD",
    "Europe",
    "Asia",
    "Australia",
    "New Zealand",
    "Africa",
    "South America",
];

static NON_ASCII: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\x00-\x7F]+").unwrap());
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[A-Z]{3,}\d{2,}\b").unwrap());
static DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b\d+\s+days?\s*/\s*\d+\s+nights?\b").unwrap());
static ROUTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+ to \w+\b").unwrap());

/// Metadata recovered from brochure cover text.
#[derive(Debug, Clone, PartialEq)]
pub struct BrochureMeta {
    pub title: String,
    pub code: String,
    pub days: String,
    pub route: String,
    pub tags: Vec<String>,
    /// Lowercased haystack used for substring search over the library
    pub search_blob: String,
}

/// Apply the fixed patterns to raw extracted text.
pub fn extract_metadata(raw_text: &str) -> BrochureMeta {
    let text = NON_ASCII.replace_all(raw_text, " ");
    let text = text.trim();

    let title: String = text.lines().next().unwrap_or("").chars().take(80).collect();
    let title = title.trim().to_string();

    let code = CODE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let days = DAYS
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let route = ROUTE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let lowered = text.to_lowercase();
    let mut tags: Vec<String> = TAG_VOCABULARY
        .iter()
        .filter(|tag| lowered.contains(&tag.to_lowercase()))
        .map(|tag| tag.to_string())
        .collect();
    if tags.is_empty() {
        tags.push("General".to_string());
    }

    let route_part = if route == NOT_AVAILABLE {
        String::new()
    } else {
        route.to_lowercase()
    };
    let search_blob = format!(
        "{} {} {}",
        title.to_lowercase(),
        route_part,
        tags.join(" ").to_lowercase()
    );

    BrochureMeta {
        title,
        code,
        days,
        route,
        tags,
        search_blob,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cover_text() {
        let text = "Enchanting Japan\nTrip code JPN2025\n12 days / 11 nights\nTokyo to Osaka\nA Land Tour through Asia";
        let meta = extract_metadata(text);
        assert_eq!(meta.title, "Enchanting Japan");
        assert_eq!(meta.code, "JPN2025");
        assert_eq!(meta.days, "12 days / 11 nights");
        assert_eq!(meta.route, "Tokyo to Osaka");
        assert_eq!(meta.tags, vec!["Land Tour".to_string(), "Asia".to_string()]);
    }

    #[test]
    fn test_unrecognizable_text_yields_defaults() {
        let meta = extract_metadata("just some ordinary words with nothing special");
        assert_eq!(meta.code, NOT_AVAILABLE);
        assert_eq!(meta.days, NOT_AVAILABLE);
        // "nothing special" does not form an "X to Y" phrase
        assert_eq!(meta.route, NOT_AVAILABLE);
        assert_eq!(meta.tags, vec!["General".to_string()]);
    }

    #[test]
    fn test_tag_match_is_case_insensitive() {
        let meta = extract_metadata("EXPLORE ASIA WITH US");
        assert!(meta.tags.contains(&"Asia".to_string()));
    }

    #[test]
    fn test_days_pattern_case_insensitive() {
        let meta = extract_metadata("duration 7 DAYS / 6 NIGHTS total");
        assert_eq!(meta.days, "7 DAYS / 6 NIGHTS");
    }

    #[test]
    fn test_route_phrase() {
        let meta = extract_metadata("sail from Broome to Darwin this winter");
        assert_eq!(meta.route, "Broome to Darwin");
    }

    #[test]
    fn test_non_ascii_stripped_from_title() {
        let meta = extract_metadata("Enchanting☆Japan 2025\nmore text");
        assert_eq!(meta.title, "Enchanting Japan 2025");
    }

    #[test]
    fn test_title_truncated_to_80_chars() {
        let long = "a".repeat(200);
        let meta = extract_metadata(&long);
        assert_eq!(meta.title.len(), 80);
    }

    #[test]
    fn test_search_blob_is_lowercase() {
        let meta = extract_metadata("Kimberley Cruise\nBroome to Darwin\nOcean Cruise Australia");
        assert!(meta.search_blob.contains("kimberley cruise"));
        assert!(meta.search_blob.contains("broome to darwin"));
        assert!(meta.search_blob.contains("ocean cruise"));
        assert_eq!(meta.search_blob, meta.search_blob.to_lowercase());
    }

    #[test]
    fn test_empty_input() {
        let meta = extract_metadata("");
        assert_eq!(meta.title, "");
        assert_eq!(meta.code, NOT_AVAILABLE);
        assert_eq!(meta.tags, vec!["General".to_string()]);
    }
}
