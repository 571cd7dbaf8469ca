//! Turns the probe results into per-category partial scores, a total and a verdict.
//!
//! Everything in this module is pure: no I/O, no clocks (the WHOIS age check takes
//! `now` as an argument), so the same results always produce the same assessment.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::core::models::{
    BlacklistResult, Category, CertificateResult, ContentResult, DynamicDnsResult, HeuristicResult,
    IssuerRisk, ProbeResult, RedirectResult, RiskAssessment, RiskLevel, SimilarityResult, UrlSubject,
    Verdict, WhoisResult, WhoisStatus,
};

/// Totals at or above this are `High`.
pub const HIGH_THRESHOLD: f64 = 4.0;
/// Totals at or above this (and below `HIGH_THRESHOLD`) are `Medium`.
pub const MEDIUM_THRESHOLD: f64 = 2.0;

/// Domains created fewer than this many days ago count as new.
pub const NEW_DOMAIN_DAYS: i64 = 30;

/// Penalty for a WHOIS lookup that could not establish the domain's age.
pub const WHOIS_UNCERTAINTY_PENALTY: f64 = 0.5;

pub fn score_blacklist(result: &BlacklistResult) -> f64 {
    if result.is_listed() { 2.0 } else { 0.0 }
}

pub fn score_heuristics(result: &HeuristicResult) -> f64 {
    let mut score = 0.0;
    if result.has_digits {
        score += 0.5;
    }
    if result.excessive_subdomains {
        score += 1.5;
    }
    if result.suspicious_chars {
        score += 1.0;
    }
    score
}

/// Parses the leading `YYYY-MM-DD` of a WHOIS creation date.
pub fn parse_creation_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Whether a domain created on `created` is younger than `NEW_DOMAIN_DAYS` at `now`.
pub fn is_domain_new(created: NaiveDate, now: DateTime<Utc>) -> bool {
    let created_at = created.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    match created_at {
        Some(created_at) => now.signed_duration_since(created_at).num_days() < NEW_DOMAIN_DAYS,
        None => false,
    }
}

pub fn score_whois(result: &WhoisResult, now: DateTime<Utc>) -> f64 {
    match (&result.status, result.creation_date.as_deref()) {
        (WhoisStatus::Found, Some(raw)) => match parse_creation_date(raw) {
            Some(created) if is_domain_new(created, now) => 1.0,
            Some(_) => 0.0,
            None => WHOIS_UNCERTAINTY_PENALTY,
        },
        _ => WHOIS_UNCERTAINTY_PENALTY,
    }
}

/// Scores the certificate posture.
///
/// A missing certificate is penalized both as missing and as expired, as the
/// probe reports it expired. The issuer reputation only applies when a
/// certificate was actually retrieved, which keeps the category within 4.0.
pub fn score_certificate(result: &CertificateResult) -> f64 {
    let mut score = 0.0;
    if result.is_missing() {
        score += 2.0;
    } else {
        score += match result.issuer_risk {
            IssuerRisk::High => 1.0,
            IssuerRisk::Medium => 0.5,
            IssuerRisk::Low => 0.0,
        };
    }
    if result.expired {
        score += 2.0;
    }
    score
}

/// Scores brand similarity. The tiers are exclusive: the highest applicable wins.
pub fn score_similarity(result: &SimilarityResult) -> f64 {
    let close = result.distances().filter(|d| (1..=3).contains(d)).count();
    if result.distances().any(|d| d == 1) {
        2.0
    } else if close >= 2 {
        1.5
    } else if close == 1 {
        1.0
    } else {
        0.0
    }
}

pub fn score_content(result: &ContentResult) -> f64 {
    let mut score = 0.0;
    if result.form_count > 0 {
        score += 0.5;
    }
    if result.requests_sensitive_data {
        score += 2.0;
    }
    score
}

pub fn score_redirect(result: &RedirectResult) -> f64 {
    if result.had_multiple_redirects { 1.0 } else { 0.0 }
}

pub fn score_dynamic_dns(result: &DynamicDnsResult) -> f64 {
    if result.is_dynamic { 1.0 } else { 0.0 }
}

/// Dispatches a probe result to the scoring rule of its category.
pub fn score_probe(result: &ProbeResult, now: DateTime<Utc>) -> f64 {
    match result {
        ProbeResult::Blacklist(r) => score_blacklist(r),
        ProbeResult::Heuristic(r) => score_heuristics(r),
        ProbeResult::Whois(r) => score_whois(r, now),
        ProbeResult::Certificate(r) => score_certificate(r),
        ProbeResult::Similarity(r) => score_similarity(r),
        ProbeResult::Content(r) => score_content(r),
        ProbeResult::Redirect(r) => score_redirect(r),
        ProbeResult::DynamicDns(r) => score_dynamic_dns(r),
    }
}

/// Maps a total score to its risk level. Thresholds are inclusive at the lower bound.
pub fn classify(total: f64) -> RiskLevel {
    if total >= HIGH_THRESHOLD {
        RiskLevel::High
    } else if total >= MEDIUM_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Builds the scored assessment from a full set of probe results.
pub fn aggregate(subject: UrlSubject, probes: Vec<ProbeResult>, now: DateTime<Utc>) -> RiskAssessment {
    let partial_scores: BTreeMap<Category, f64> =
        probes.iter().map(|probe| (probe.category(), score_probe(probe, now))).collect();
    let total_score: f64 = partial_scores.values().sum();
    let verdict = Verdict { level: classify(total_score), score: total_score };

    debug!(total = total_score, level = %verdict.level, "Aggregated probe results.");

    RiskAssessment {
        subject,
        results: probes.into_iter().map(|probe| (probe.category(), probe)).collect(),
        partial_scores,
        total_score,
        verdict,
        bypass_reason: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::BrandDistance;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn similarity(distances: &[(&str, usize)]) -> SimilarityResult {
        SimilarityResult {
            per_brand_distance: distances
                .iter()
                .map(|(domain, distance)| BrandDistance {
                    brand: domain.to_string(),
                    domain: domain.to_string(),
                    distance: *distance,
                })
                .collect(),
        }
    }

    fn quiet_probes() -> Vec<ProbeResult> {
        vec![
            ProbeResult::Blacklist(BlacklistResult::default()),
            ProbeResult::Heuristic(HeuristicResult::default()),
            ProbeResult::Whois(WhoisResult::found("2001-01-01T00:00:00Z")),
            ProbeResult::Certificate(CertificateResult {
                issuer: "C=US, O=Let's Encrypt, CN=R3".to_string(),
                not_after: "Dec 31 00:00:00 2099 +00:00".to_string(),
                expired: false,
                issuer_risk: IssuerRisk::Low,
            }),
            ProbeResult::Similarity(similarity(&[("google.com", 9)])),
            ProbeResult::Content(ContentResult::default()),
            ProbeResult::Redirect(RedirectResult::default()),
            ProbeResult::DynamicDns(DynamicDnsResult::default()),
        ]
    }

    #[test]
    fn thresholds_are_inclusive_at_lower_bound() {
        assert_eq!(classify(0.0), RiskLevel::Low);
        assert_eq!(classify(1.5), RiskLevel::Low);
        assert_eq!(classify(2.0), RiskLevel::Medium);
        assert_eq!(classify(3.5), RiskLevel::Medium);
        assert_eq!(classify(4.0), RiskLevel::High);
        assert_eq!(classify(12.0), RiskLevel::High);
    }

    #[test]
    fn blacklist_is_or_not_sum() {
        let static_only = BlacklistResult { on_safe_browsing: false, on_static_list: true };
        let both = BlacklistResult { on_safe_browsing: true, on_static_list: true };
        assert_eq!(score_blacklist(&static_only), 2.0);
        assert_eq!(score_blacklist(&both), 2.0);
        assert_eq!(score_blacklist(&BlacklistResult::default()), 0.0);
    }

    #[test]
    fn heuristics_stay_within_bounds() {
        let all = HeuristicResult { has_digits: true, excessive_subdomains: true, suspicious_chars: true };
        assert_eq!(score_heuristics(&all), 3.0);
        assert_eq!(score_heuristics(&HeuristicResult::default()), 0.0);
    }

    #[test]
    fn whois_29_days_is_new_31_is_not() {
        let day29 = (now() - Duration::days(29)).format("%Y-%m-%d").to_string();
        let day31 = (now() - Duration::days(31)).format("%Y-%m-%d").to_string();
        assert_eq!(score_whois(&WhoisResult::found(format!("{day29}T04:00:00Z")), now()), 1.0);
        assert_eq!(score_whois(&WhoisResult::found(format!("{day31}T04:00:00Z")), now()), 0.0);
    }

    #[test]
    fn whois_uncertainty_penalty() {
        assert_eq!(score_whois(&WhoisResult::found("sometime last year"), now()), 0.5);
        for status in [WhoisStatus::NotFound, WhoisStatus::Unavailable, WhoisStatus::UnsupportedTld, WhoisStatus::Error] {
            assert_eq!(score_whois(&WhoisResult::with_status(status), now()), 0.5);
        }
    }

    #[test]
    fn missing_certificate_scores_the_maximum() {
        assert_eq!(score_certificate(&CertificateResult::no_certificate()), 4.0);
    }

    #[test]
    fn certificate_scores_by_issuer_and_expiry() {
        let mut cert = CertificateResult {
            issuer: "CN=Some Private CA".to_string(),
            not_after: "Jan  1 00:00:00 2020 +00:00".to_string(),
            expired: true,
            issuer_risk: IssuerRisk::Medium,
        };
        assert_eq!(score_certificate(&cert), 2.5);
        cert.issuer_risk = IssuerRisk::High;
        assert_eq!(score_certificate(&cert), 3.0);
        cert.expired = false;
        cert.issuer_risk = IssuerRisk::Low;
        assert_eq!(score_certificate(&cert), 0.0);
    }

    #[test]
    fn similarity_tiers_do_not_stack() {
        assert_eq!(score_similarity(&similarity(&[("google.com", 1), ("bing.com", 3)])), 2.0);
        assert_eq!(score_similarity(&similarity(&[("google.com", 2), ("bing.com", 3)])), 1.5);
        assert_eq!(score_similarity(&similarity(&[("paypal.com", 2), ("bing.com", 8)])), 1.0);
        assert_eq!(score_similarity(&similarity(&[("paypal.com", 0), ("bing.com", 8)])), 0.0);
        assert_eq!(score_similarity(&SimilarityResult::default()), 0.0);
    }

    #[test]
    fn content_flags_are_additive() {
        let result = ContentResult { form_count: 2, requests_sensitive_data: true };
        assert_eq!(score_content(&result), 2.5);
        assert_eq!(score_content(&ContentResult { form_count: 1, requests_sensitive_data: false }), 0.5);
    }

    #[test]
    fn total_is_exact_sum_of_partials() {
        let mut probes = quiet_probes();
        probes[1] = ProbeResult::Heuristic(HeuristicResult {
            has_digits: true,
            excessive_subdomains: false,
            suspicious_chars: true,
        });
        probes[7] = ProbeResult::DynamicDns(DynamicDnsResult { is_dynamic: true });

        let assessment = aggregate(UrlSubject::parse("a1!.example.com"), probes, now());
        assert_eq!(assessment.partial_scores.len(), 8);
        assert_eq!(assessment.results.len(), 8);
        let sum: f64 = assessment.partial_scores.values().sum();
        assert_eq!(assessment.total_score, sum);
        assert_eq!(assessment.total_score, 2.5);
        assert_eq!(assessment.verdict.level, RiskLevel::Medium);
        assert!(!assessment.is_bypassed());
    }

    #[test]
    fn clean_site_is_low() {
        let assessment = aggregate(UrlSubject::parse("example.com"), quiet_probes(), now());
        assert_eq!(assessment.total_score, 0.0);
        assert_eq!(assessment.verdict.to_string(), "Low (0)");
    }

    #[test]
    fn lookalike_login_page_scenario_is_high() {
        let created = (now() - Duration::days(5)).format("%Y-%m-%d").to_string();
        let probes = vec![
            ProbeResult::Blacklist(BlacklistResult::default()),
            ProbeResult::Heuristic(HeuristicResult::default()),
            ProbeResult::Whois(WhoisResult::found(created)),
            ProbeResult::Certificate(CertificateResult::no_certificate()),
            ProbeResult::Similarity(similarity(&[("google.com", 8), ("paypal.com", 2)])),
            ProbeResult::Content(ContentResult { form_count: 2, requests_sensitive_data: true }),
            ProbeResult::Redirect(RedirectResult { had_multiple_redirects: false, hop_count: 1 }),
            ProbeResult::DynamicDns(DynamicDnsResult::default()),
        ];

        let assessment = aggregate(UrlSubject::parse("http://paypa1-login.com"), probes, now());
        let partial = |c: Category| assessment.partial_scores[&c];

        assert_eq!(partial(Category::Certificate), 4.0);
        assert_eq!(partial(Category::Whois), 1.0);
        assert_eq!(partial(Category::Content), 2.5);
        assert_eq!(partial(Category::Similarity), 1.0);
        assert_eq!(partial(Category::Blacklist), 0.0);
        assert_eq!(partial(Category::Heuristic), 0.0);
        assert_eq!(partial(Category::Redirect), 0.0);
        assert_eq!(partial(Category::DynamicDns), 0.0);
        assert!(assessment.total_score >= 7.5);
        assert_eq!(assessment.verdict.level, RiskLevel::High);
        assert_eq!(assessment.verdict.to_string(), "High (8.5)");
    }
}
