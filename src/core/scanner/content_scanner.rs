// src/core/scanner/content_scanner.rs

use std::time::Duration;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, error, info};

use crate::core::models::ContentResult;

static FORM_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("form").unwrap());

/// Markers that make a form look like it harvests credentials.
const SENSITIVE_MARKERS: &[&str] = &["password", "login"];

/// Fetches the page and inspects its forms.
///
/// Fails open: an unreachable page or an unreadable body is reported as a page
/// without forms.
pub async fn run_content_scan(client: &reqwest::Client, url: &str, timeout: Duration) -> ContentResult {
    info!(url, "Starting content scan.");

    let response = match client.get(url).timeout(timeout).send().await {
        Ok(res) => {
            info!(status = %res.status(), "Received HTTP response.");
            res
        }
        Err(e) => {
            error!(url, error = %e, "HTTP request failed");
            return ContentResult::default();
        }
    };

    let body = match response.text().await {
        Ok(text) => {
            debug!(bytes = %text.len(), "Successfully read response body.");
            text
        }
        Err(e) => {
            error!(error = %e, "Failed to read response body");
            return ContentResult::default();
        }
    };

    let result = analyze_markup(&body);
    info!(forms = result.form_count, sensitive = result.requests_sensitive_data, "Content scan finished.");
    result
}

/// Counts `<form>` elements and checks whether any of them asks for credentials.
pub fn analyze_markup(body: &str) -> ContentResult {
    let document = Html::parse_document(body);

    let mut form_count = 0;
    let mut requests_sensitive_data = false;
    for form in document.select(&FORM_SELECTOR) {
        form_count += 1;
        let markup = form.html().to_lowercase();
        if SENSITIVE_MARKERS.iter().any(|marker| markup.contains(marker)) {
            requests_sensitive_data = true;
        }
    }

    ContentResult { form_count, requests_sensitive_data }
}
