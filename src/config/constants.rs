//! Default values for every tunable of the assessment pipeline.

use std::time::Duration;

/// WHOIS read/connect budget. Registry servers can be slow to close the stream.
pub const WHOIS_TIMEOUT: Duration = Duration::from_secs(10);
/// TLS connect and handshake budget.
pub const TLS_TIMEOUT: Duration = Duration::from_secs(5);
/// Budget for each HTTP request (page fetch, redirect walk, Safe Browsing lookup).
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

pub const WHOIS_PORT: u16 = 43;
pub const TLS_PORT: u16 = 443;

/// Redirect hops followed before the redirect probe gives up on a chain.
pub const MAX_REDIRECT_HOPS: usize = 10;

pub const SAFE_BROWSING_URL: &str = "https://safebrowsing.googleapis.com/v4/threatMatches:find";
pub const SAFE_BROWSING_CLIENT_ID: &str = "vanguard-phish";

/// Static phishing-domain list, one hostname per line.
pub const DEFAULT_BLACKLIST_PATH: &str = "ALL-phishing-domains.txt";

pub const USER_AGENT: &str = concat!("VanguardPhish/", env!("CARGO_PKG_VERSION"));

// Environment variables read by `Settings::from_env`.
pub const ENV_SAFE_BROWSING_KEY: &str = "GSB_API_KEY";
pub const ENV_SAFE_BROWSING_URL: &str = "VANGUARD_PHISH_SAFE_BROWSING_URL";
pub const ENV_BLACKLIST_PATH: &str = "VANGUARD_PHISH_BLACKLIST";
pub const ENV_WHOIS_TIMEOUT: &str = "VANGUARD_PHISH_WHOIS_TIMEOUT_SECS";
pub const ENV_TLS_TIMEOUT: &str = "VANGUARD_PHISH_TLS_TIMEOUT_SECS";
pub const ENV_HTTP_TIMEOUT: &str = "VANGUARD_PHISH_HTTP_TIMEOUT_SECS";
