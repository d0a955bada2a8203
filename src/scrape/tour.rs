//! Tour-page scraping with per-field failure accounting.
//!
//! Each field extraction yields a [`FieldOutcome`]; a failed field degrades
//! to its default value and is recorded in the record's [`ScrapeReport`]
//! instead of aborting the record. A navigation failure fails the whole
//! record, which the caller logs before moving to the next URL.

use anyhow::{Context, Result};
use chromiumoxide::Page;
use chrono::Utc;
use std::time::Duration;

use crate::models::TourRecord;

const NAV_TIMEOUT: Duration = Duration::from_secs(60);
const SELECTOR_TIMEOUT: Duration = Duration::from_secs(10);
const SETTLE_DELAY: Duration = Duration::from_millis(2000);
const SCROLL_DELAY: Duration = Duration::from_millis(1500);
const BOOKING_DELAY: Duration = Duration::from_millis(3000);

/// One field extraction: the value, or the reason it is missing.
pub type FieldOutcome<T> = std::result::Result<T, String>;

/// A field that failed during one record's scrape.
#[derive(Debug, Clone)]
pub struct FieldFailure {
    pub field: &'static str,
    pub reason: String,
}

/// Per-record scrape accounting.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub url: String,
    pub failures: Vec<FieldFailure>,
}

/// A scraped record together with its field-level report.
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub record: TourRecord,
    pub report: ScrapeReport,
}

/// Resolve a field outcome: record the failure and fall back to the default.
fn settle<T: Default>(
    outcome: FieldOutcome<T>,
    field: &'static str,
    failures: &mut Vec<FieldFailure>,
) -> T {
    match outcome {
        Ok(v) => v,
        Err(reason) => {
            failures.push(FieldFailure { field, reason });
            T::default()
        }
    }
}

/// Derive region and country from the `/tours/<region>/<country>/...` URL
/// path, capitalized.
pub fn region_country_from_url(url: &str) -> (String, String) {
    let tail = url.split("/tours/").nth(1).unwrap_or("");
    let mut parts = tail.split('/');
    let region = parts.next().map(capitalize).unwrap_or_default();
    let country = parts.next().map(capitalize).unwrap_or_default();
    (region, country)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strip the "Trip code" label and separator from the raw element text.
pub fn clean_trip_code(raw: &str) -> String {
    let mut out = raw.to_string();
    for label in ["Trip code", "Trip Code", "TRIP CODE", "trip code"] {
        out = out.replace(label, "");
    }
    out.replace(':', "").trim().to_string()
}

/// Scrape one tour page (and its booking page when linked) into a record.
pub async fn extract_tour_info(page: &Page, url: &str) -> Result<ScrapeOutcome> {
    tokio::time::timeout(NAV_TIMEOUT, page.goto(url))
        .await
        .map_err(|_| anyhow::anyhow!("Navigation timed out"))?
        .with_context(|| format!("Failed to navigate to {url}"))?;
    tokio::time::sleep(SETTLE_DELAY).await;
    scroll_to_bottom(page).await;
    tokio::time::sleep(SCROLL_DELAY).await;

    let mut failures = Vec::new();
    let (region, country) = region_country_from_url(url);

    let trip_name = settle(text_of(page, "h1").await, "trip_name", &mut failures);
    let trip_code_raw = settle(
        text_containing(page, "Trip code").await,
        "trip_code",
        &mut failures,
    );
    let description = settle(
        text_of(page, "div.hero-tour__summary p, div.hero__content p").await,
        "description",
        &mut failures,
    );
    let trip_inclusions = settle(
        inclusion_texts(page).await,
        "trip_inclusions",
        &mut failures,
    );
    let booking_url = settle(
        attr_of(page, "a[href*=\"booking.aptouring.com\"]", "href").await,
        "booking_url",
        &mut failures,
    );

    let mut record = TourRecord {
        trip_name: trip_name.trim().to_string(),
        trip_code: clean_trip_code(&trip_code_raw),
        region,
        country,
        description: description.trim().to_string(),
        original_url: url.to_string(),
        booking_url,
        trip_inclusions,
        scraped_at: Some(Utc::now()),
        ..Default::default()
    };

    if !record.booking_url.is_empty() {
        extract_booking_info(page, &mut record, &mut failures).await;
    }

    Ok(ScrapeOutcome {
        record,
        report: ScrapeReport {
            url: url.to_string(),
            failures,
        },
    })
}

/// Follow the booking page for dates, price, and availability. Any failure
/// here leaves the booking fields at their defaults.
async fn extract_booking_info(
    page: &Page,
    record: &mut TourRecord,
    failures: &mut Vec<FieldFailure>,
) {
    let nav = tokio::time::timeout(NAV_TIMEOUT, page.goto(record.booking_url.as_str())).await;
    match nav {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => {
            failures.push(FieldFailure {
                field: "booking_page",
                reason: format!("navigation failed: {e}"),
            });
            return;
        }
        Err(_) => {
            failures.push(FieldFailure {
                field: "booking_page",
                reason: "navigation timed out".to_string(),
            });
            return;
        }
    }
    tokio::time::sleep(BOOKING_DELAY).await;

    if let Err(reason) = wait_for_selector(page, ".chakra-card__body", SELECTOR_TIMEOUT).await {
        failures.push(FieldFailure {
            field: "booking_page",
            reason,
        });
        return;
    }

    let dates = settle(
        texts_of(page, ".chakra-card__body p.chakra-text.css-1r6zo4l").await,
        "booking_dates",
        failures,
    );
    record.start_date = dates.first().map(|s| s.trim().to_string()).unwrap_or_default();
    record.end_date = dates.get(1).map(|s| s.trim().to_string()).unwrap_or_default();

    record.price_aud = settle(
        text_of(page, ".chakra-card__body p.chakra-text.css-68j6fv").await,
        "price_aud",
        failures,
    )
    .trim()
    .to_string();

    record.limited_availability = settle(
        page_mentions(page, "Limited availability").await,
        "limited_availability",
        failures,
    );
}

// ─── Page primitives ─────────────────────────────────────

async fn scroll_to_bottom(page: &Page) {
    if let Err(e) = page
        .evaluate("window.scrollTo(0, document.body.scrollHeight)")
        .await
    {
        tracing::debug!("Scroll failed: {e}");
    }
}

/// Inner text of the first element matching a CSS selector.
async fn text_of(page: &Page, selector: &str) -> FieldOutcome<String> {
    let el = page
        .find_element(selector)
        .await
        .map_err(|e| format!("selector '{selector}' not found: {e}"))?;
    el.inner_text()
        .await
        .map_err(|e| format!("could not read text of '{selector}': {e}"))?
        .ok_or_else(|| format!("'{selector}' has no text"))
}

/// Inner texts of all elements matching a CSS selector.
async fn texts_of(page: &Page, selector: &str) -> FieldOutcome<Vec<String>> {
    let els = page
        .find_elements(selector)
        .await
        .map_err(|e| format!("selector '{selector}' not found: {e}"))?;
    let mut out = Vec::new();
    for el in els {
        if let Ok(Some(text)) = el.inner_text().await {
            if !text.trim().is_empty() {
                out.push(text.trim().to_string());
            }
        }
    }
    Ok(out)
}

/// Attribute value of the first element matching a CSS selector.
async fn attr_of(page: &Page, selector: &str, attr: &str) -> FieldOutcome<String> {
    let el = page
        .find_element(selector)
        .await
        .map_err(|e| format!("selector '{selector}' not found: {e}"))?;
    el.attribute(attr)
        .await
        .map_err(|e| format!("could not read {attr} of '{selector}': {e}"))?
        .ok_or_else(|| format!("'{selector}' has no {attr}"))
}

/// Text of the first leaf element whose content contains `needle`
/// (case-insensitive). CSS has no text matcher, so this runs in the page.
async fn text_containing(page: &Page, needle: &str) -> FieldOutcome<String> {
    let escaped = needle.replace('\\', "\\\\").replace('\'', "\\'");
    let js = format!(
        "(() => {{\
           const re = new RegExp('{escaped}', 'i');\
           const el = Array.from(document.querySelectorAll('p,span,div,li'))\
             .find(n => n.children.length === 0 && re.test(n.textContent || ''));\
           return el ? el.textContent : null;\
         }})()"
    );
    let result = page
        .evaluate(js)
        .await
        .map_err(|e| format!("text search for '{needle}' failed: {e}"))?;
    result
        .into_value::<Option<String>>()
        .map_err(|e| format!("text search for '{needle}' returned no value: {e}"))?
        .ok_or_else(|| format!("no element contains '{needle}'"))
}

/// Whether the page's visible text contains `needle`.
async fn page_mentions(page: &Page, needle: &str) -> FieldOutcome<bool> {
    let escaped = needle.replace('\\', "\\\\").replace('\'', "\\'");
    let js = format!("document.body ? document.body.innerText.includes('{escaped}') : false");
    let result = page
        .evaluate(js)
        .await
        .map_err(|e| format!("page text check failed: {e}"))?;
    result
        .into_value::<bool>()
        .map_err(|e| format!("page text check returned no value: {e}"))
}

/// Span texts inside the inclusions grid, skipping hidden variants.
async fn inclusion_texts(page: &Page) -> FieldOutcome<Vec<String>> {
    texts_of(page, "section div.d_grid span:not([class*='d_none'])").await
}

/// Poll for a selector until it appears or the timeout elapses.
async fn wait_for_selector(
    page: &Page,
    selector: &str,
    timeout: Duration,
) -> std::result::Result<(), String> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if page.find_element(selector).await.is_ok() {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(format!("'{selector}' did not appear within {timeout:?}"));
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
}
