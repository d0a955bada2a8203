//! Fleet-page tools: sitemap link extraction and page-to-PDF rendering.

use anyhow::{Context, Result};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Page;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

const NAV_TIMEOUT: Duration = Duration::from_secs(60);
const RENDER_DELAY: Duration = Duration::from_millis(5000);

static LOC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<loc>\s*([^<]+?)\s*</loc>").unwrap());

/// Pull fleet detail-page URLs out of sitemap XML: `<loc>` entries that
/// contain `/our-fleet/` and sit deeper than the section index page.
pub fn extract_fleet_urls(sitemap_xml: &str) -> Vec<String> {
    LOC.captures_iter(sitemap_xml)
        .map(|c| c[1].to_string())
        .filter(|url| url.contains("/our-fleet/") && url.matches('/').count() > 4)
        .collect()
}

/// Fetch the sitemap and return the fleet detail-page URLs.
pub async fn fetch_fleet_links(client: &reqwest::Client, sitemap_url: &str) -> Result<Vec<String>> {
    let resp = client
        .get(sitemap_url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch sitemap {sitemap_url}"))?;

    if !resp.status().is_success() {
        anyhow::bail!("Sitemap fetch returned {}", resp.status());
    }

    let body = resp.text().await.context("Failed to read sitemap body")?;
    Ok(extract_fleet_urls(&body))
}

/// The path-derived identifier a fleet page's PDF is named after.
pub fn ship_id_from_url(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("page")
        .to_string()
}

/// Navigate to a fleet page, let dynamic content settle, and print it to an
/// A4 PDF.
pub async fn render_page_pdf(page: &Page, url: &str) -> Result<Vec<u8>> {
    tokio::time::timeout(NAV_TIMEOUT, page.goto(url))
        .await
        .map_err(|_| anyhow::anyhow!("Navigation timed out"))?
        .with_context(|| format!("Failed to navigate to {url}"))?;

    if let Err(e) = page
        .evaluate("window.scrollTo(0, document.body.scrollHeight)")
        .await
    {
        tracing::debug!("Scroll failed: {e}");
    }
    tokio::time::sleep(RENDER_DELAY).await;

    let params = PrintToPdfParams {
        // A4 in inches
        paper_width: Some(8.27),
        paper_height: Some(11.69),
        ..Default::default()
    };
    page.pdf(params)
        .await
        .with_context(|| format!("Failed to print {url} to PDF"))
}
