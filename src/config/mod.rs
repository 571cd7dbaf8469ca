//! Runtime configuration for the assessment pipeline.
//!
//! Settings come from the process environment (the binary loads an optional
//! `.env` file first). Every value has a default in [`constants`], so an empty
//! environment yields a working configuration with the remote blacklist check
//! disabled.

pub mod constants;

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use self::constants::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds greater than zero, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Everything the probes need to know that is not part of the URL itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Safe Browsing API key. `None` disables the remote blacklist lookup.
    pub safe_browsing_key: Option<String>,
    pub safe_browsing_url: String,
    pub blacklist_path: PathBuf,
    pub whois_timeout: Duration,
    pub tls_timeout: Duration,
    pub http_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            safe_browsing_key: None,
            safe_browsing_url: SAFE_BROWSING_URL.to_string(),
            blacklist_path: PathBuf::from(DEFAULT_BLACKLIST_PATH),
            whois_timeout: WHOIS_TIMEOUT,
            tls_timeout: TLS_TIMEOUT,
            http_timeout: HTTP_TIMEOUT,
        }
    }
}

impl Settings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Self {
            safe_browsing_key: non_empty(ENV_SAFE_BROWSING_KEY),
            safe_browsing_url: non_empty(ENV_SAFE_BROWSING_URL).unwrap_or(defaults.safe_browsing_url),
            blacklist_path: non_empty(ENV_BLACKLIST_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.blacklist_path),
            whois_timeout: parse_timeout(ENV_WHOIS_TIMEOUT, non_empty(ENV_WHOIS_TIMEOUT))?
                .unwrap_or(defaults.whois_timeout),
            tls_timeout: parse_timeout(ENV_TLS_TIMEOUT, non_empty(ENV_TLS_TIMEOUT))?
                .unwrap_or(defaults.tls_timeout),
            http_timeout: parse_timeout(ENV_HTTP_TIMEOUT, non_empty(ENV_HTTP_TIMEOUT))?
                .unwrap_or(defaults.http_timeout),
        })
    }
}

fn parse_timeout(var: &'static str, value: Option<String>) -> Result<Option<Duration>, ConfigError> {
    match value {
        None => Ok(None),
        Some(value) => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
            _ => Err(ConfigError::InvalidTimeout { var, value }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn overrides_are_applied() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_SAFE_BROWSING_KEY, "secret"),
            (ENV_BLACKLIST_PATH, "/tmp/list.txt"),
            (ENV_HTTP_TIMEOUT, "12"),
        ]))
        .unwrap();
        assert_eq!(settings.safe_browsing_key.as_deref(), Some("secret"));
        assert_eq!(settings.blacklist_path, PathBuf::from("/tmp/list.txt"));
        assert_eq!(settings.http_timeout, Duration::from_secs(12));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let settings = Settings::from_lookup(lookup(&[(ENV_SAFE_BROWSING_KEY, "  ")])).unwrap();
        assert_eq!(settings.safe_browsing_key, None);
    }

    #[test]
    fn malformed_timeout_is_rejected() {
        let err = Settings::from_lookup(lookup(&[(ENV_TLS_TIMEOUT, "soon")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout { var: ENV_TLS_TIMEOUT, value: "soon".to_string() });
        assert!(Settings::from_lookup(lookup(&[(ENV_WHOIS_TIMEOUT, "0")])).is_err());
    }
}
