// src/core/scanner/heuristic_scanner.rs

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::models::HeuristicResult;

static RE_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").unwrap());
static RE_SUSPICIOUS_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[@%$!]").unwrap());

/// More dots than this is read as too many subdomain levels.
const MAX_DOTS: usize = 3;

/// Evaluates lexical red flags on the URL exactly as the user supplied it.
///
/// Pure string matching: no I/O, and no input can make it fail.
pub fn run_heuristic_scan(url: &str) -> HeuristicResult {
    let result = HeuristicResult {
        has_digits: RE_DIGIT.is_match(url),
        excessive_subdomains: url.matches('.').count() > MAX_DOTS,
        suspicious_chars: RE_SUSPICIOUS_CHARS.is_match(url),
    };
    debug!(url, ?result, "Heuristic scan finished.");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_url_raises_nothing() {
        assert_eq!(run_heuristic_scan("https://example.com/login"), HeuristicResult::default());
    }

    #[test]
    fn digits_anywhere_are_flagged() {
        assert!(run_heuristic_scan("paypa1.com").has_digits);
        assert!(run_heuristic_scan("example.com/page?id=7").has_digits);
    }

    #[test]
    fn more_than_three_dots_is_excessive() {
        assert!(!run_heuristic_scan("a.b.c.com").excessive_subdomains);
        assert!(run_heuristic_scan("secure.login.account.paypal.com").excessive_subdomains);
    }

    #[test]
    fn each_suspicious_symbol_is_flagged() {
        for url in ["user@evil.com", "evil.com/%20", "evil.com/$", "evil.com/!"] {
            assert!(run_heuristic_scan(url).suspicious_chars, "{url}");
        }
    }
}
