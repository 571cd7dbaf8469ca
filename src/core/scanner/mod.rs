// src/core/scanner/mod.rs

// One module per probe; each exposes a `run_*_scan` entry point that never fails.
pub mod blacklist_scanner;
pub mod content_scanner;
pub mod dynamic_dns_scanner;
pub mod heuristic_scanner;
pub mod redirect_scanner;
pub mod similarity_scanner;
pub mod ssl_scanner;
pub mod whois_scanner;

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Settings;
use crate::config::constants::USER_AGENT;
use crate::core::models::{
    CertificateResult, ContentResult, ProbeResult, RedirectResult, RiskAssessment, UrlSubject, WhoisResult,
    WhoisStatus,
};
use crate::core::scoring;
use crate::core::target::whitelist_gate;

use self::blacklist_scanner::{StaticBlacklist, run_blacklist_scan};
use self::content_scanner::run_content_scan;
use self::dynamic_dns_scanner::run_dynamic_dns_scan;
use self::heuristic_scanner::run_heuristic_scan;
use self::redirect_scanner::run_redirect_scan;
use self::similarity_scanner::run_similarity_scan;
use self::ssl_scanner::run_ssl_scan;
use self::whois_scanner::run_whois_scan;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AssessmentError {
    #[error("'{0}' is not a URL with a hostname")]
    InvalidUrl(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Long-lived, read-only state shared by every assessment.
///
/// Build it once at startup; it can be shared across concurrent assessments
/// (behind an `Arc` if needed) without any locking.
#[derive(Debug, Clone)]
pub struct ScanContext {
    pub settings: Settings,
    pub static_blacklist: StaticBlacklist,
    http: reqwest::Client,
}

impl ScanContext {
    /// Builds the context, loading the static blacklist from `settings.blacklist_path`.
    pub fn new(settings: Settings) -> Result<Self, AssessmentError> {
        let static_blacklist = StaticBlacklist::load(&settings.blacklist_path);
        Self::with_blacklist(settings, static_blacklist)
    }

    pub fn with_blacklist(settings: Settings, static_blacklist: StaticBlacklist) -> Result<Self, AssessmentError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AssessmentError::HttpClient(e.to_string()))?;
        Ok(Self { settings, static_blacklist, http })
    }
}

/// Runs `probe` under its own deadline, substituting `fallback` if it runs out.
async fn with_deadline<T, F>(name: &'static str, deadline: Duration, probe: F, fallback: impl FnOnce() -> T) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(deadline, probe).await {
        Ok(result) => result,
        Err(_) => {
            warn!(probe = name, ?deadline, "Probe timed out, using its default result.");
            fallback()
        }
    }
}

/// Assesses a URL end to end.
///
/// Whitelisted hostnames return immediately. Otherwise every probe runs
/// concurrently under its own timeout, so the whole assessment takes at most
/// as long as the slowest probe's budget. The only error is an input that
/// has no hostname, which is rejected before any probe runs.
pub async fn run_full_scan(raw_url: &str, ctx: &ScanContext) -> Result<RiskAssessment, AssessmentError> {
    let subject = UrlSubject::parse(raw_url);
    let Some(hostname) = subject.hostname.as_deref() else {
        warn!(input = raw_url, "Rejected input without a hostname.");
        return Err(AssessmentError::InvalidUrl(raw_url.to_string()));
    };

    if let Some(assessment) = whitelist_gate(&subject) {
        return Ok(assessment);
    }

    info!(url = %subject.normalized, hostname, "Starting full assessment.");
    let settings = &ctx.settings;
    let host = Some(hostname);

    // Slightly over the probes' own timeouts so their internal defaults win when they can.
    let grace = Duration::from_millis(500);

    let (blacklist, whois, certificate, content, redirect) = tokio::join!(
        run_blacklist_scan(
            &ctx.http,
            &settings.safe_browsing_url,
            settings.safe_browsing_key.as_deref(),
            &ctx.static_blacklist,
            &subject.normalized,
            host,
            settings.http_timeout,
        ),
        with_deadline(
            "whois",
            settings.whois_timeout + grace,
            run_whois_scan(host, settings.whois_timeout),
            || WhoisResult::with_status(WhoisStatus::Error),
        ),
        with_deadline(
            "certificate",
            settings.tls_timeout * 2 + grace,
            run_ssl_scan(host, settings.tls_timeout),
            CertificateResult::no_certificate,
        ),
        with_deadline(
            "content",
            settings.http_timeout + grace,
            run_content_scan(&ctx.http, &subject.normalized, settings.http_timeout),
            ContentResult::default,
        ),
        with_deadline(
            "redirect",
            settings.http_timeout + grace,
            run_redirect_scan(&subject.normalized, settings.http_timeout),
            RedirectResult::default,
        ),
    );

    let probes = vec![
        ProbeResult::Blacklist(blacklist),
        ProbeResult::Heuristic(run_heuristic_scan(&subject.raw)),
        ProbeResult::Whois(whois),
        ProbeResult::Certificate(certificate),
        ProbeResult::Similarity(run_similarity_scan(subject.unicode_hostname.as_deref())),
        ProbeResult::Content(content),
        ProbeResult::Redirect(redirect),
        ProbeResult::DynamicDns(run_dynamic_dns_scan(host)),
    ];

    let assessment = scoring::aggregate(subject.clone(), probes, Utc::now());
    info!(verdict = %assessment.verdict, "Assessment finished.");
    Ok(assessment)
}
