use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::path::Path;

use crate::models::{BrochureCard, BrochurePage};
use crate::pdf::{extract, meta};
use crate::state::AppState;

/// Cards per page in the library listing.
pub const PAGE_SIZE: usize = 15;

/// How many leading pages to inspect for metadata.
const META_PAGES: usize = 2;

#[derive(Debug, Deserialize)]
pub struct BrochureQuery {
    pub q: Option<String>,
    pub page: Option<usize>,
}

/// GET /api/brochures - Browse the local brochure library with metadata
/// extracted from each PDF's cover pages.
pub async fn list_brochures(
    State(state): State<AppState>,
    Query(query): Query<BrochureQuery>,
) -> Result<Json<BrochurePage>, (StatusCode, String)> {
    let dir = state.config.brochure_dir.clone();

    let cards = tokio::task::spawn_blocking(move || scan_brochures(&dir))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Brochure scan failed: {e}"),
            )
        })?;

    let needle = query.q.unwrap_or_default().trim().to_lowercase();
    let filtered = filter_brochures(cards, &needle);

    let page = query.page.unwrap_or(1).max(1);
    Ok(Json(paginate(filtered, page)))
}

/// Scan the brochure directory: every `.pdf` file, sorted by name, with
/// best-effort metadata. An unreadable file degrades to an error card
/// rather than failing the listing.
fn scan_brochures(dir: &Path) -> Vec<(BrochureCard, String)> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|n| n.to_lowercase().ends_with(".pdf"))
            .collect(),
        Err(e) => {
            tracing::warn!("Cannot read brochure dir {}: {e}", dir.display());
            return Vec::new();
        }
    };
    names.sort();

    names
        .into_iter()
        .map(|file_name| {
            let path = dir.join(&file_name);
            match extract::extract_leading_text(&path, META_PAGES) {
                Ok(text) => {
                    let m = meta::extract_metadata(&text);
                    let blob = m.search_blob.clone();
                    (
                        BrochureCard {
                            file_name,
                            title: m.title,
                            code: m.code,
                            days: m.days,
                            route: m.route,
                            tags: m.tags,
                        },
                        blob,
                    )
                }
                Err(e) => {
                    tracing::warn!("Metadata extraction failed for {file_name}: {e:#}");
                    (
                        BrochureCard {
                            title: meta::NOT_AVAILABLE.to_string(),
                            code: meta::NOT_AVAILABLE.to_string(),
                            days: meta::NOT_AVAILABLE.to_string(),
                            route: meta::NOT_AVAILABLE.to_string(),
                            tags: vec!["Error".to_string()],
                            file_name,
                        },
                        String::new(),
                    )
                }
            }
        })
        .collect()
}

/// Case-insensitive substring filter over the metadata blob and file name.
fn filter_brochures(
    cards: Vec<(BrochureCard, String)>,
    needle: &str,
) -> Vec<BrochureCard> {
    cards
        .into_iter()
        .filter(|(card, blob)| {
            needle.is_empty()
                || blob.contains(needle)
                || card.file_name.to_lowercase().contains(needle)
        })
        .map(|(card, _)| card)
        .collect()
}

fn paginate(cards: Vec<BrochureCard>, page: usize) -> BrochurePage {
    let total_matches = cards.len();
    let total_pages = if total_matches == 0 {
        1
    } else {
        (total_matches - 1) / PAGE_SIZE + 1
    };
    let page = page.min(total_pages);
    let start = (page - 1) * PAGE_SIZE;
    let brochures = cards
        .into_iter()
        .skip(start)
        .take(PAGE_SIZE)
        .collect();

    BrochurePage {
        brochures,
        page,
        total_pages,
        total_matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(file_name: &str, blob: &str) -> (BrochureCard, String) {
        (
            BrochureCard {
                file_name: file_name.to_string(),
                title: String::new(),
                code: meta::NOT_AVAILABLE.to_string(),
                days: meta::NOT_AVAILABLE.to_string(),
                route: meta::NOT_AVAILABLE.to_string(),
                tags: vec!["General".to_string()],
            },
            blob.to_string(),
        )
    }

    #[test]
    fn test_filter_matches_blob() {
        let cards = vec![card("a.pdf", "broome to darwin ocean cruise"), card("b.pdf", "danube river cruise")];
        let out = filter_brochures(cards, "darwin");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].file_name, "a.pdf");
    }

    #[test]
    fn test_filter_matches_file_name_case_insensitive() {
        let cards = vec![card("Japan-Tour.pdf", "")];
        let out = filter_brochures(cards, "japan");
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_filter_empty_needle_keeps_all() {
        let cards = vec![card("a.pdf", ""), card("b.pdf", "")];
        assert_eq!(filter_brochures(cards, "").len(), 2);
    }

    #[test]
    fn test_paginate_counts() {
        let cards: Vec<_> = (0..32).map(|i| card(&format!("{i}.pdf"), "")).collect();
        let cards: Vec<BrochureCard> = cards.into_iter().map(|(c, _)| c).collect();
        let page = paginate(cards, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_matches, 32);
        assert_eq!(page.brochures.len(), 2);
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate(Vec::new(), 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.brochures.is_empty());
    }

    #[test]
    fn test_paginate_clamps_out_of_range_page() {
        let cards: Vec<BrochureCard> = (0..5)
            .map(|i| card(&format!("{i}.pdf"), "").0)
            .collect();
        let page = paginate(cards, 99);
        assert_eq!(page.page, 1);
        assert_eq!(page.brochures.len(), 5);
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let out = scan_brochures(Path::new("/nonexistent/brochures"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_scan_ignores_non_pdf_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        let out = scan_brochures(dir.path());
        assert!(out.is_empty());
    }

    #[test]
    fn test_scan_unreadable_pdf_degrades_to_error_card() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.pdf"), "not a pdf").unwrap();
        let out = scan_brochures(dir.path());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0.tags, vec!["Error".to_string()]);
    }
}
