// src/core/target.rs

use std::collections::BTreeMap;

use tracing::{debug, info};
use url::Url;

use crate::core::knowledge_base::{TRUSTED_WHITELIST, WHITELIST_REASON};
use crate::core::models::{RiskAssessment, RiskLevel, UrlSubject, Verdict};

impl UrlSubject {
    /// Normalizes raw user input and extracts its hostname.
    ///
    /// Input without an `http://` or `https://` scheme is prefixed with `http://`.
    /// Never fails: input that does not parse to a URL with a host yields a
    /// subject whose `hostname` is `None`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        let normalized = if lower.starts_with("http://") || lower.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };

        let hostname = Url::parse(&normalized)
            .ok()
            .and_then(|url| url.host_str().map(String::from))
            .filter(|host| !host.is_empty());

        let unicode_hostname = hostname.as_deref().map(|host| {
            let (unicode, result) = idna::domain_to_unicode(host);
            if result.is_err() {
                debug!(host, "Hostname has invalid punycode labels.");
            }
            unicode
        });

        debug!(
            raw = trimmed,
            normalized = %normalized,
            hostname = ?hostname,
            unicode_hostname = ?unicode_hostname,
            "Resolved URL subject."
        );

        Self {
            raw: raw.to_string(),
            normalized,
            hostname,
            unicode_hostname,
        }
    }
}

/// Returns `true` when the hostname is on the trusted whitelist (exact match).
pub fn is_trusted(hostname: &str) -> bool {
    TRUSTED_WHITELIST.contains(hostname)
}

/// Short-circuits the pipeline for trusted domains.
///
/// Returns a fixed Low assessment carrying the bypass reason, or `None` if the
/// subject has to go through the probes. Subdomains of trusted domains are
/// deliberately not matched, so `login.google.com` is scanned while
/// `google.com` is not; that also means anything hosted on a whitelisted
/// apex is never rechecked.
pub fn whitelist_gate(subject: &UrlSubject) -> Option<RiskAssessment> {
    let hostname = subject.hostname.as_deref()?;
    if !is_trusted(hostname) {
        return None;
    }

    info!(hostname, "Hostname is whitelisted, skipping all probes.");
    Some(RiskAssessment {
        subject: subject.clone(),
        results: BTreeMap::new(),
        partial_scores: BTreeMap::new(),
        total_score: 0.0,
        verdict: Verdict { level: RiskLevel::Low, score: 0.0 },
        bypass_reason: Some(WHITELIST_REASON.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge_base::TRUSTED_WHITELIST;

    #[test]
    fn bare_domain_gets_http_scheme() {
        let subject = UrlSubject::parse("example.com/login");
        assert_eq!(subject.normalized, "http://example.com/login");
        assert_eq!(subject.hostname.as_deref(), Some("example.com"));
    }

    #[test]
    fn existing_scheme_is_kept() {
        let subject = UrlSubject::parse("https://Secure.Example.COM:8443/a?b=c");
        assert_eq!(subject.normalized, "https://Secure.Example.COM:8443/a?b=c");
        assert_eq!(subject.hostname.as_deref(), Some("secure.example.com"));
    }

    #[test]
    fn hostname_starting_with_http_is_still_prefixed() {
        let subject = UrlSubject::parse("httpbin.org");
        assert_eq!(subject.hostname.as_deref(), Some("httpbin.org"));
    }

    #[test]
    fn internationalized_hostname_keeps_both_forms() {
        let subject = UrlSubject::parse("http://p\u{0430}ypal.com/login");
        let ascii = subject.hostname.as_deref().unwrap();
        assert!(ascii.starts_with("xn--"));
        assert_eq!(subject.unicode_hostname.as_deref(), Some("p\u{0430}ypal.com"));
    }

    #[test]
    fn ascii_hostname_has_identical_unicode_form() {
        let subject = UrlSubject::parse("Login.Example.com");
        assert_eq!(subject.unicode_hostname, subject.hostname);
    }

    #[test]
    fn malformed_input_has_no_hostname() {
        assert_eq!(UrlSubject::parse("").hostname, None);
        assert_eq!(UrlSubject::parse("").unicode_hostname, None);
        assert_eq!(UrlSubject::parse("http://").hostname, None);
        assert_eq!(UrlSubject::parse("exa mple.com").hostname, None);
    }

    #[test]
    fn every_whitelisted_domain_short_circuits_low() {
        for domain in TRUSTED_WHITELIST.iter() {
            let subject = UrlSubject::parse(domain);
            let assessment = whitelist_gate(&subject).expect("whitelisted domain must bypass");
            assert!(assessment.results.is_empty());
            assert!(assessment.partial_scores.is_empty());
            assert_eq!(assessment.verdict.level, RiskLevel::Low);
            assert_eq!(assessment.total_score, 0.0);
            assert!(assessment.bypass_reason.is_some());
        }
    }

    #[test]
    fn subdomains_of_trusted_domains_are_not_bypassed() {
        assert!(whitelist_gate(&UrlSubject::parse("accounts.google.com")).is_none());
        assert!(whitelist_gate(&UrlSubject::parse("www.paypal.com")).is_none());
    }

    #[test]
    fn missing_hostname_is_not_bypassed() {
        assert!(whitelist_gate(&UrlSubject::parse("")).is_none());
    }
}
