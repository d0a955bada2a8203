//! Render each fleet page in the URL list to a PDF artifact.
//!
//! Usage: render-fleet-pdfs [URL_LIST] [OUTPUT_DIR]
//!
//! Sequential by design: one browser, one page, one URL at a time. A failed
//! URL is logged and the loop continues.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use intelliguide::scrape::{self, fleet};

const DEFAULT_URL_LIST: &str = "fleets_urls.txt";
const DEFAULT_OUTPUT_DIR: &str = "Fleet_pdfs";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let url_list = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_URL_LIST.to_string()));
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()));

    let urls = scrape::read_url_list(&url_list)?;
    std::fs::create_dir_all(&output_dir)?;

    let (mut browser, events) = scrape::launch_browser().await?;
    let page = browser.new_page("about:blank").await?;

    let mut saved = 0usize;
    for url in &urls {
        let ship_id = fleet::ship_id_from_url(url);
        tracing::info!("Saving PDF for {ship_id}");

        match fleet::render_page_pdf(&page, url).await {
            Ok(bytes) => {
                let path = output_dir.join(format!("{ship_id}.pdf"));
                if let Err(e) = write_pdf(&path, &bytes) {
                    tracing::error!("Failed to write {}: {e:#}", path.display());
                } else {
                    tracing::info!("Saved {}", path.display());
                    saved += 1;
                }
            }
            Err(e) => {
                tracing::error!("Failed for {url}: {e:#}");
            }
        }
    }

    browser.close().await?;
    let _ = events.await;

    tracing::info!("Saved {saved} of {} fleet PDFs", urls.len());
    Ok(())
}

fn write_pdf(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("pdf.tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
