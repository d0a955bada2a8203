//! Client for the external document search service.
//!
//! The service owns chunking, indexing, and relevance ranking; this side
//! issues queries and index-rebuild requests and extracts snippet text from
//! whatever columns the service returns. Column lookup is case-insensitive
//! against the configured search column, with a literal placeholder when the
//! column is absent from a result row.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::SearchConfig;
use crate::models::RetrievalResult;

/// Placeholder snippet used when a result row lacks the search column.
pub const MISSING_CHUNK: &str = "[Missing chunk]";

/// Source identifier used when a result row lacks `relative_path`.
const UNKNOWN_SOURCE: &str = "unknown";

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Value>,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<HashMap<String, Value>>,
}

/// Metadata describing one search service exposed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceMetadata {
    pub name: String,
    pub search_column: String,
}

/// Query the search service and return ranked snippets with their sources.
/// Ranking is opaque to this side; results come back in service order.
pub async fn search(
    client: &reqwest::Client,
    config: &SearchConfig,
    query: &str,
    limit: usize,
    topic: Option<&str>,
) -> Result<Vec<RetrievalResult>> {
    let url = format!(
        "{}/api/services/{}/search",
        config.base_url, config.service_name
    );

    let filter = topic.map(|t| serde_json::json!({ "@eq": { "region": t } }));
    let req = SearchRequest {
        query,
        limit,
        filter,
    };

    let resp = client
        .post(&url)
        .timeout(Duration::from_secs(config.timeout_secs))
        .json(&req)
        .send()
        .await
        .context("Failed to call search service")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Search service returned {status}: {body}");
    }

    let body: SearchResponse = resp
        .json()
        .await
        .context("Failed to parse search response")?;

    Ok(body
        .results
        .iter()
        .map(|row| result_from_row(row, &config.search_column))
        .collect())
}

/// List the search services the backend exposes, with their search columns.
pub async fn list_services(
    client: &reqwest::Client,
    config: &SearchConfig,
) -> Result<Vec<ServiceMetadata>> {
    let url = format!("{}/api/services", config.base_url);

    let resp = client
        .get(&url)
        .timeout(Duration::from_secs(config.timeout_secs))
        .send()
        .await
        .context("Failed to list search services")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Search service returned {status}: {body}");
    }

    resp.json()
        .await
        .context("Failed to parse service metadata")
}

/// Trigger an unconditional rebuild of the search index after a file has
/// been staged. Not idempotent by design: every upload rebuilds.
pub async fn rebuild_index(
    client: &reqwest::Client,
    config: &SearchConfig,
    staged_file: &str,
) -> Result<()> {
    let url = format!(
        "{}/api/services/{}/rebuild",
        config.base_url, config.service_name
    );

    let resp = client
        .post(&url)
        .timeout(Duration::from_secs(config.timeout_secs))
        .json(&serde_json::json!({ "file": staged_file }))
        .send()
        .await
        .context("Failed to call index rebuild")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Index rebuild returned {status}: {body}");
    }

    tracing::info!("Index rebuild triggered for {staged_file}");
    Ok(())
}

/// Extract source and snippet from one result row. The snippet column is
/// matched case-insensitively; missing values fall back to placeholders
/// rather than failing the query.
fn result_from_row(row: &HashMap<String, Value>, search_column: &str) -> RetrievalResult {
    let source = row
        .get("relative_path")
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN_SOURCE)
        .to_string();

    let snippet = row
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(search_column))
        .and_then(|(_, v)| v.as_str())
        .unwrap_or(MISSING_CHUNK)
        .to_string();

    RetrievalResult { source, snippet }
}
