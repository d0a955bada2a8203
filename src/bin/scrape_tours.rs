//! Scrape tour detail pages into `tour_info.json`.
//!
//! Usage: scrape-tours [URL_LIST] [OUTPUT]
//!
//! One browser, one page, one URL at a time. A URL that fails entirely is
//! logged and skipped; per-field failures are logged and the record keeps its
//! defaults for those fields. The output file is written once, at the end.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use intelliguide::models::TourRecord;
use intelliguide::scrape::{self, tour};

const DEFAULT_URL_LIST: &str = "tour_urls.txt";
const DEFAULT_OUTPUT: &str = "tour_info.json";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let url_list = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_URL_LIST.to_string()));
    let output = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string()));

    let urls = scrape::read_url_list(&url_list)?;
    tracing::info!("Scraping {} tour pages", urls.len());

    let (mut browser, events) = scrape::launch_browser().await?;
    let page = browser.new_page("about:blank").await?;

    let mut records: Vec<TourRecord> = Vec::with_capacity(urls.len());
    for (i, url) in urls.iter().enumerate() {
        tracing::info!("[{}/{}] {url}", i + 1, urls.len());

        match tour::extract_tour_info(&page, url).await {
            Ok(outcome) => {
                for failure in &outcome.report.failures {
                    tracing::warn!(
                        "{url}: field '{}' missing: {}",
                        failure.field,
                        failure.reason
                    );
                }
                records.push(outcome.record);
            }
            Err(e) => {
                tracing::error!("Failed to scrape {url}: {e:#}");
            }
        }
    }

    browser.close().await?;
    let _ = events.await;

    write_records(&output, &records)?;
    tracing::info!(
        "Wrote {} of {} records to {}",
        records.len(),
        urls.len(),
        output.display()
    );
    Ok(())
}

fn write_records(path: &Path, records: &[TourRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
