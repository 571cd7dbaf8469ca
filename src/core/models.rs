// src/core/models.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum::{Display, EnumIter};

// --- Input ---

/// The URL under assessment, as typed and as normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlSubject {
    pub raw: String,
    pub normalized: String,
    /// `None` when the input could not be parsed as a URL with a host.
    /// Internationalized names are kept in their ASCII (punycode) form.
    pub hostname: Option<String>,
    /// The hostname with punycode labels decoded back to Unicode.
    pub unicode_hostname: Option<String>,
}

// --- Categories ---

/// The named groups under which each probe reports its contribution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Category {
    #[strum(to_string = "Phishing Blacklists")]
    Blacklist,
    #[strum(to_string = "Lexical Heuristics")]
    Heuristic,
    #[strum(to_string = "WHOIS")]
    Whois,
    #[strum(to_string = "TLS Certificate")]
    Certificate,
    #[strum(to_string = "Brand Similarity")]
    Similarity,
    #[strum(to_string = "HTML Content")]
    Content,
    #[strum(to_string = "Suspicious Redirects")]
    Redirect,
    #[strum(to_string = "Dynamic DNS")]
    DynamicDns,
}

// --- Probe Results ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistResult {
    pub on_safe_browsing: bool,
    pub on_static_list: bool,
}

impl BlacklistResult {
    pub fn is_listed(&self) -> bool {
        self.on_safe_browsing || self.on_static_list
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicResult {
    pub has_digits: bool,
    pub excessive_subdomains: bool,
    pub suspicious_chars: bool,
}

/// Outcome of a registry WHOIS lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum WhoisStatus {
    /// A `Creation Date` line was recovered.
    Found,
    /// The registry answered but carried no creation date.
    NotFound,
    /// There was no hostname to look up.
    Unavailable,
    /// The TLD has no configured registry server.
    UnsupportedTld,
    /// Connection, timeout or protocol failure.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisResult {
    pub creation_date: Option<String>,
    pub status: WhoisStatus,
}

impl WhoisResult {
    pub fn with_status(status: WhoisStatus) -> Self {
        Self { creation_date: None, status }
    }

    pub fn found(creation_date: impl Into<String>) -> Self {
        Self { creation_date: Some(creation_date.into()), status: WhoisStatus::Found }
    }
}

/// How much the certificate issuer is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum IssuerRisk {
    Low,
    Medium,
    High,
}

/// Issuer value recorded when no certificate could be retrieved.
pub const NO_CERTIFICATE: &str = "no certificate";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateResult {
    pub issuer: String,
    pub not_after: String,
    pub expired: bool,
    pub issuer_risk: IssuerRisk,
}

impl CertificateResult {
    /// The fail-closed value used whenever the handshake does not produce a certificate.
    pub fn no_certificate() -> Self {
        Self {
            issuer: NO_CERTIFICATE.to_string(),
            not_after: "unknown".to_string(),
            expired: true,
            issuer_risk: IssuerRisk::High,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.issuer == NO_CERTIFICATE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandDistance {
    pub brand: String,
    pub domain: String,
    pub distance: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// One entry per registered brand, in registry order.
    pub per_brand_distance: Vec<BrandDistance>,
}

impl SimilarityResult {
    pub fn distances(&self) -> impl Iterator<Item = usize> + '_ {
        self.per_brand_distance.iter().map(|b| b.distance)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentResult {
    pub form_count: usize,
    pub requests_sensitive_data: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectResult {
    pub had_multiple_redirects: bool,
    pub hop_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicDnsResult {
    pub is_dynamic: bool,
}

/// The result of a single probe, tagged by the category it reports under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeResult {
    Blacklist(BlacklistResult),
    Heuristic(HeuristicResult),
    Whois(WhoisResult),
    Certificate(CertificateResult),
    Similarity(SimilarityResult),
    Content(ContentResult),
    Redirect(RedirectResult),
    DynamicDns(DynamicDnsResult),
}

impl ProbeResult {
    pub fn category(&self) -> Category {
        match self {
            ProbeResult::Blacklist(_) => Category::Blacklist,
            ProbeResult::Heuristic(_) => Category::Heuristic,
            ProbeResult::Whois(_) => Category::Whois,
            ProbeResult::Certificate(_) => Category::Certificate,
            ProbeResult::Similarity(_) => Category::Similarity,
            ProbeResult::Content(_) => Category::Content,
            ProbeResult::Redirect(_) => Category::Redirect,
            ProbeResult::DynamicDns(_) => Category::DynamicDns,
        }
    }
}

// --- Verdict ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// The risk level together with the exact total it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub level: RiskLevel,
    pub score: f64,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.level, self.score)
    }
}

// --- Main Report ---

/// The full, precomputed outcome of assessing one URL.
///
/// On the whitelist path `results` and `partial_scores` are empty and
/// `bypass_reason` explains why; on the scored path every category is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub subject: UrlSubject,
    pub results: BTreeMap<Category, ProbeResult>,
    pub partial_scores: BTreeMap<Category, f64>,
    pub total_score: f64,
    pub verdict: Verdict,
    pub bypass_reason: Option<String>,
}

impl RiskAssessment {
    pub fn is_bypassed(&self) -> bool {
        self.bypass_reason.is_some()
    }
}
