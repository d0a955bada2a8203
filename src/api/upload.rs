use anyhow::{Context, Result};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;

use crate::config::Config;
use crate::models::UploadResponse;
use crate::pdf::extract;
use crate::retrieval;
use crate::state::AppState;

/// POST /api/upload - Accept one PDF, extract its text, stage the file, and
/// trigger a search-index rebuild. Each upload rebuilds unconditionally.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), (StatusCode, String)> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid upload: {e}")))?
    {
        if let Some(name) = field.file_name().map(|s| s.to_string()) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid upload: {e}")))?;
            file = Some((name, bytes.to_vec()));
            break;
        }
    }

    let (file_name, bytes) =
        file.ok_or((StatusCode::BAD_REQUEST, "No PDF file provided".to_string()))?;

    let response = ingest_pdf(&state.http_client, &state.config, &file_name, &bytes)
        .await
        .map_err(|e| {
            tracing::error!("Upload of {file_name} failed: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to upload/index: {e:#}"),
            )
        })?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// The upload pipeline proper: extract per-page text (a document yielding no
/// text aborts before any side effect), stage the file durably, and invoke
/// the external index rebuild. On extraction failure nothing is staged and
/// no rebuild happens.
pub async fn ingest_pdf(
    client: &reqwest::Client,
    config: &Config,
    file_name: &str,
    bytes: &[u8],
) -> Result<UploadResponse> {
    let pages = extract::extract_pages(bytes)?;
    anyhow::ensure!(
        !pages.is_empty(),
        "No text could be extracted from {file_name}"
    );
    tracing::info!("Extracted text from {} pages of {file_name}", pages.len());

    let staged_name = sanitize_file_name(file_name);
    let staged_path = stage_file(config, &staged_name, bytes)?;
    tracing::info!("Staged {file_name} at {}", staged_path);

    retrieval::rebuild_index(client, &config.search, &staged_name).await?;

    Ok(UploadResponse {
        file_name: file_name.to_string(),
        pages_extracted: pages.len(),
        staged_path,
        index_rebuilt: true,
    })
}

/// Write the PDF into the durable staging directory (atomic replace).
fn stage_file(config: &Config, staged_name: &str, bytes: &[u8]) -> Result<String> {
    let staging_dir = config.staging_dir();
    std::fs::create_dir_all(&staging_dir)
        .with_context(|| format!("Failed to create {}", staging_dir.display()))?;

    let target = staging_dir.join(staged_name);
    let tmp = target.with_extension("pdf.tmp");
    std::fs::write(&tmp, bytes)
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, &target)
        .with_context(|| format!("Failed to replace {}", target.display()))?;

    Ok(target.display().to_string())
}

/// Keep only the final path component and replace spaces, so an uploaded
/// name can neither escape the staging directory nor break the rebuild SQL
/// on the service side.
fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .replace(' ', "_");
    if base.is_empty() {
        "upload.pdf".to_string()
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_spaces() {
        assert_eq!(
            sanitize_file_name("Vietnam Cambodia.pdf"),
            "Vietnam_Cambodia.pdf"
        );
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd.pdf"), "passwd.pdf");
        assert_eq!(sanitize_file_name("C:\\docs\\tour.pdf"), "tour.pdf");
    }

    #[test]
    fn test_sanitize_empty_name() {
        assert_eq!(sanitize_file_name(""), "upload.pdf");
    }
}
