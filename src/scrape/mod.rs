//! Headless-browser batch tools: tour-record scraping and fleet-page PDF
//! rendering. Everything here is sequential: one browser, one page, one URL
//! at a time, matching the batch scripts these tools replace.

use anyhow::Result;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures_util::StreamExt;

pub mod fleet;
pub mod tour;

/// Launch a headless browser and spawn the CDP event loop. The returned
/// handle must be kept alive for the lifetime of the browser.
pub async fn launch_browser() -> Result<(Browser, tokio::task::JoinHandle<()>)> {
    let config = BrowserConfig::builder()
        .build()
        .map_err(anyhow::Error::msg)?;
    let (browser, mut handler) = Browser::launch(config).await?;
    let events = tokio::spawn(async move { while handler.next().await.is_some() {} });
    Ok((browser, events))
}

/// Read a newline-delimited URL list, skipping blank lines.
pub fn read_url_list(path: &std::path::Path) -> Result<Vec<String>> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    Ok(data
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| l.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_url_list_skips_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        std::fs::write(&path, "https://a.example/one\n\n  \nhttps://a.example/two\n").unwrap();
        let urls = read_url_list(&path).unwrap();
        assert_eq!(urls, vec!["https://a.example/one", "https://a.example/two"]);
    }

    #[test]
    fn test_read_url_list_missing_file() {
        assert!(read_url_list(std::path::Path::new("/nonexistent/urls.txt")).is_err());
    }
}
