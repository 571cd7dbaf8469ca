// src/core/scanner/blacklist_scanner.rs

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::constants::SAFE_BROWSING_CLIENT_ID;
use crate::core::models::BlacklistResult;

/// Hostnames known to serve phishing, loaded once and never modified.
#[derive(Debug, Clone, Default)]
pub struct StaticBlacklist {
    domains: HashSet<String>,
}

impl StaticBlacklist {
    /// Loads a newline-delimited domain list.
    ///
    /// A missing or unreadable file is a soft failure: it is logged and an
    /// empty list is returned, so lookups simply never match.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let list = Self::from_lines(&contents);
                info!(path = %path.display(), entries = list.len(), "Loaded static phishing blacklist.");
                list
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Static phishing blacklist unavailable, treating as empty.");
                Self::default()
            }
        }
    }

    pub fn from_lines(contents: &str) -> Self {
        let domains = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        Self { domains }
    }

    /// Exact hostname membership.
    pub fn contains(&self, hostname: &str) -> bool {
        self.domains.contains(hostname)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

// --- Safe Browsing v4 request body ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatMatchRequest<'a> {
    client: ClientInfo<'a>,
    threat_info: ThreatInfo<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo<'a> {
    client_id: &'a str,
    client_version: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo<'a> {
    threat_types: [&'a str; 3],
    platform_types: [&'a str; 1],
    threat_entry_types: [&'a str; 1],
    threat_entries: [ThreatEntry<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ThreatEntry<'a> {
    url: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ThreatMatchResponse {
    #[serde(default)]
    matches: Vec<Value>,
}

fn threat_match_request(url: &str) -> ThreatMatchRequest<'_> {
    ThreatMatchRequest {
        client: ClientInfo {
            client_id: SAFE_BROWSING_CLIENT_ID,
            client_version: env!("CARGO_PKG_VERSION"),
        },
        threat_info: ThreatInfo {
            threat_types: ["MALWARE", "SOCIAL_ENGINEERING", "UNWANTED_SOFTWARE"],
            platform_types: ["ANY_PLATFORM"],
            threat_entry_types: ["URL"],
            threat_entries: [ThreatEntry { url }],
        },
    }
}

/// Whether a Safe Browsing response body reports at least one match.
fn has_matches(body: &str) -> Result<bool, String> {
    let response: ThreatMatchResponse =
        serde_json::from_str(body).map_err(|e| format!("Malformed Safe Browsing response: {}", e))?;
    Ok(!response.matches.is_empty())
}

async fn query_safe_browsing(
    client: &reqwest::Client,
    endpoint: &str,
    api_key: &str,
    url: &str,
    timeout: Duration,
) -> Result<bool, String> {
    let response = client
        .post(endpoint)
        .query(&[("key", api_key)])
        .json(&threat_match_request(url))
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| format!("Safe Browsing request failed: {}", e))?;

    debug!(status = %response.status(), "Received Safe Browsing response.");
    let body = response
        .text()
        .await
        .map_err(|e| format!("Failed to read Safe Browsing response: {}", e))?;
    has_matches(&body)
}

/// Checks the URL against Safe Browsing and the hostname against the static list.
///
/// The remote lookup fails open: a missing key, a transport error or an
/// unreadable response all count as "not listed".
pub async fn run_blacklist_scan(
    client: &reqwest::Client,
    endpoint: &str,
    api_key: Option<&str>,
    static_list: &StaticBlacklist,
    url: &str,
    hostname: Option<&str>,
    timeout: Duration,
) -> BlacklistResult {
    info!(url, "Starting blacklist scan.");

    let on_static_list = hostname.is_some_and(|h| static_list.contains(h));

    let on_safe_browsing = match api_key {
        None => {
            debug!("No Safe Browsing key configured, skipping remote lookup.");
            false
        }
        Some(key) => match tokio::time::timeout(timeout, query_safe_browsing(client, endpoint, key, url, timeout)).await {
            Ok(Ok(listed)) => listed,
            Ok(Err(e)) => {
                error!(error = %e, "Safe Browsing lookup failed, assuming not listed.");
                false
            }
            Err(_) => {
                warn!(?timeout, "Safe Browsing lookup timed out, assuming not listed.");
                false
            }
        },
    };

    let result = BlacklistResult { on_safe_browsing, on_static_list };
    info!(?result, "Blacklist scan finished.");
    result
}
