//! Fetch the site sitemap and write the fleet detail-page URL list.
//!
//! Usage: fetch-fleet-links [SITEMAP_URL] [OUTPUT_FILE]

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use intelliguide::scrape::fleet;

const DEFAULT_SITEMAP: &str = "https://www.aptouring.com/en-au/sitemap.xml";
const DEFAULT_OUTPUT: &str = "fleets_urls.txt";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let sitemap_url = args.next().unwrap_or_else(|| DEFAULT_SITEMAP.to_string());
    let output = args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    let client = reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(10))
        .timeout(std::time::Duration::from_secs(60))
        .build()?;

    let urls = fleet::fetch_fleet_links(&client, &sitemap_url).await?;
    std::fs::write(&output, urls.join("\n") + "\n")?;

    tracing::info!("Extracted {} fleet detail pages into {output}", urls.len());
    Ok(())
}
