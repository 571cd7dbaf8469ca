// src/core/scanner/whois_scanner.rs

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, error, info, warn};

use crate::config::constants::WHOIS_PORT;
use crate::core::knowledge_base::whois_server_for;
use crate::core::models::{WhoisResult, WhoisStatus};

static RE_CREATION_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*Creation Date:[ \t]*(\S.*?)\s*$").unwrap());

/// Looks up the domain's creation date at its registry.
///
/// Only TLDs with a configured registry server are queried; everything else
/// returns `UnsupportedTld` without touching the network.
pub async fn run_whois_scan(hostname: Option<&str>, timeout: Duration) -> WhoisResult {
    let Some(hostname) = hostname else {
        debug!("No hostname, WHOIS lookup unavailable.");
        return WhoisResult::with_status(WhoisStatus::Unavailable);
    };

    let tld = hostname.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    let Some(server) = whois_server_for(&tld) else {
        debug!(hostname, tld = %tld, "TLD not covered by any WHOIS server.");
        return WhoisResult::with_status(WhoisStatus::UnsupportedTld);
    };

    let domain = registrable_domain(hostname);
    info!(domain = %domain, server, "Starting WHOIS lookup.");

    let response = match tokio::time::timeout(timeout, query_whois(server, &domain)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            error!(error = %e, "WHOIS query failed.");
            return WhoisResult::with_status(WhoisStatus::Error);
        }
        Err(_) => {
            warn!(?timeout, "WHOIS query timed out.");
            return WhoisResult::with_status(WhoisStatus::Error);
        }
    };

    let result = match extract_creation_date(&response) {
        Some(date) => WhoisResult::found(date),
        None => WhoisResult::with_status(WhoisStatus::NotFound),
    };
    info!(status = %result.status, creation_date = ?result.creation_date, "WHOIS lookup finished.");
    result
}

/// The last two labels of the hostname, which is what `.com`/`.net` registries index.
pub fn registrable_domain(hostname: &str) -> String {
    let labels: Vec<&str> = hostname.trim_end_matches('.').split('.').collect();
    let start = labels.len().saturating_sub(2);
    labels[start..].join(".")
}

/// Pulls the first `Creation Date:` value out of a raw WHOIS response.
pub fn extract_creation_date(response: &str) -> Option<String> {
    RE_CREATION_DATE
        .captures(response)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

async fn query_whois(server: &str, domain: &str) -> Result<String, String> {
    debug!(server, "Connecting to WHOIS server.");
    let mut stream = TcpStream::connect((server, WHOIS_PORT))
        .await
        .map_err(|e| format!("WHOIS connection error: {}", e))?;

    stream
        .write_all(format!("{}\r\n", domain).as_bytes())
        .await
        .map_err(|e| format!("WHOIS write error: {}", e))?;

    let mut raw = Vec::new();
    stream
        .read_to_end(&mut raw)
        .await
        .map_err(|e| format!("WHOIS read error: {}", e))?;

    debug!(bytes = raw.len(), "Read WHOIS response.");
    Ok(String::from_utf8_lossy(&raw).into_owned())
}
