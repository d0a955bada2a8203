use anyhow::{Context, Result};
use axum::extract::{Path as AxumPath, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::path::Path;

use crate::models::{TourRecord, TourUpdate};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TourQuery {
    pub q: Option<String>,
}

/// GET /api/tours - List scraped tour records, filtered by substring over
/// name, code, region, and country.
pub async fn list_tours(
    State(state): State<AppState>,
    Query(query): Query<TourQuery>,
) -> Result<Json<Vec<TourRecord>>, (StatusCode, String)> {
    let tours = load_tours(&state.config.tours_path()).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to load tours: {e:#}"),
        )
    })?;

    let needle = query.q.unwrap_or_default().trim().to_lowercase();
    Ok(Json(filter_tours(tours, &needle)))
}

/// PUT /api/tours/{code} - Update the editable fields of one tour record
/// and rewrite the whole file. Last writer wins; there is no per-record
/// transaction.
pub async fn update_tour(
    State(state): State<AppState>,
    AxumPath(code): AxumPath<String>,
    Json(update): Json<TourUpdate>,
) -> Result<Json<TourRecord>, (StatusCode, String)> {
    let path = state.config.tours_path();
    let mut tours = load_tours(&path).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to load tours: {e:#}"),
        )
    })?;

    let record = tours
        .iter_mut()
        .find(|t| t.trip_code == code)
        .ok_or((StatusCode::NOT_FOUND, format!("No tour with code {code}")))?;

    apply_update(record, update);
    let updated = record.clone();

    save_tours(&path, &tours).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to save tours: {e:#}"),
        )
    })?;

    Ok(Json(updated))
}

/// Load the tour records file; a missing file is an empty list.
pub fn load_tours(path: &Path) -> Result<Vec<TourRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Rewrite the tour records file wholesale (atomic replace).
pub fn save_tours(path: &Path, tours: &[TourRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let data = serde_json::to_string_pretty(tours)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &data).with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

fn filter_tours(tours: Vec<TourRecord>, needle: &str) -> Vec<TourRecord> {
    if needle.is_empty() {
        return tours;
    }
    tours
        .into_iter()
        .filter(|t| {
            t.trip_name.to_lowercase().contains(needle)
                || t.trip_code.to_lowercase().contains(needle)
                || t.region.to_lowercase().contains(needle)
                || t.country.to_lowercase().contains(needle)
        })
        .collect()
}

fn apply_update(record: &mut TourRecord, update: TourUpdate) {
    if let Some(v) = update.start_date {
        record.start_date = v;
    }
    if let Some(v) = update.end_date {
        record.end_date = v;
    }
    if let Some(v) = update.price_aud {
        record.price_aud = v;
    }
    if let Some(v) = update.limited_availability {
        record.limited_availability = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tour(name: &str, code: &str, region: &str, country: &str) -> TourRecord {
        TourRecord {
            trip_name: name.to_string(),
            trip_code: code.to_string(),
            region: region.to_string(),
            country: country.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_filter_by_country() {
        let tours = vec![
            tour("Enchanting Japan", "JP1", "Asia", "Japan"),
            tour("Danube Cruise", "EU1", "Europe", "Austria"),
        ];
        let out = filter_tours(tours, "japan");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].trip_code, "JP1");
    }

    #[test]
    fn test_filter_by_code_case_insensitive() {
        let tours = vec![tour("Kimberley", "AUKW25", "Australia", "Australia")];
        assert_eq!(filter_tours(tours, "aukw").len(), 1);
    }

    #[test]
    fn test_apply_update_partial() {
        let mut record = tour("Japan", "JP1", "Asia", "Japan");
        record.price_aud = "$5,000".to_string();
        apply_update(
            &mut record,
            TourUpdate {
                start_date: Some("12 May 2026".to_string()),
                end_date: None,
                price_aud: None,
                limited_availability: Some(true),
            },
        );
        assert_eq!(record.start_date, "12 May 2026");
        assert_eq!(record.price_aud, "$5,000");
        assert!(record.limited_availability);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let tours = load_tours(&dir.path().join("tour_info.json")).unwrap();
        assert!(tours.is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tour_info.json");
        let tours = vec![tour("Japan", "JP1", "Asia", "Japan")];
        save_tours(&path, &tours).unwrap();
        let back = load_tours(&path).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].trip_name, "Japan");
    }
}
