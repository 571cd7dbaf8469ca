//! Static, read-only reference data used by the probes and the front-end.
//!
//! Everything here is a process-lifetime constant: the trusted whitelist, the
//! brand registry, the certificate-authority reputation lists, the dynamic-DNS
//! provider fragments, and a human-readable description of every category.
//! Keeping it data-driven means the lists can be updated without touching any
//! probe logic.

use crate::core::models::Category;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// A well-known brand and the canonical domain it is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brand {
    pub name: &'static str,
    pub domain: &'static str,
}

/// Brands that lookalike domains are measured against, in a fixed order.
pub static BRAND_REGISTRY: &[Brand] = &[
    Brand { name: "Google", domain: "google.com" },
    Brand { name: "PayPal", domain: "paypal.com" },
    Brand { name: "Apple", domain: "apple.com" },
    Brand { name: "Microsoft", domain: "microsoft.com" },
    Brand { name: "Facebook", domain: "facebook.com" },
    Brand { name: "Amazon", domain: "amazon.com" },
    Brand { name: "Netflix", domain: "netflix.com" },
    Brand { name: "Twitter", domain: "twitter.com" },
    Brand { name: "YouTube", domain: "youtube.com" },
    Brand { name: "Instagram", domain: "instagram.com" },
    Brand { name: "LinkedIn", domain: "linkedin.com" },
    Brand { name: "Adobe", domain: "adobe.com" },
    Brand { name: "iCloud", domain: "icloud.com" },
    Brand { name: "Dropbox", domain: "dropbox.com" },
    Brand { name: "WhatsApp", domain: "whatsapp.com" },
    Brand { name: "TikTok", domain: "tiktok.com" },
    Brand { name: "Bing", domain: "bing.com" },
    Brand { name: "Spotify", domain: "spotify.com" },
    Brand { name: "Salesforce", domain: "salesforce.com" },
    Brand { name: "Zoom", domain: "zoom.us" },
];

/// Domains that bypass every probe. Exact match only: subdomains are not covered.
pub static TRUSTED_WHITELIST: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "google.com",
        "facebook.com",
        "youtube.com",
        "amazon.com",
        "microsoft.com",
        "apple.com",
        "paypal.com",
        "netflix.com",
        "twitter.com",
        "instagram.com",
        "linkedin.com",
        "adobe.com",
        "icloud.com",
        "dropbox.com",
        "whatsapp.com",
        "tiktok.com",
        "bing.com",
        "spotify.com",
        "salesforce.com",
        "zoom.us",
    ]
    .into_iter()
    .collect()
});

/// Justification attached to every whitelist short-circuit.
pub const WHITELIST_REASON: &str =
    "This domain is on a list of globally recognized trusted domains; all other checks were skipped.";

/// Certificate authorities whose name in the issuer DN implies low risk.
pub static REPUTABLE_CAS: &[&str] = &["Let's Encrypt", "Google Trust", "DigiCert", "GlobalSign", "Sectigo"];

/// Lower-assurance certificate authorities, commonly seen on throwaway hosting.
pub static LOW_ASSURANCE_CAS: &[&str] = &["cPanel", "ZeroSSL", "Buypass", "TrustAsia"];

/// Hostname fragments belonging to dynamic-DNS providers.
pub static DYNAMIC_DNS_PROVIDERS: &[&str] = &["no-ip", "dyndns", "duckdns", "hopto.org", "freeddns.org", "myftp.biz"];

/// Registry WHOIS servers, keyed by TLD. Only these TLDs can be aged.
pub static WHOIS_SERVERS: &[(&str, &str)] = &[("com", "whois.verisign-grs.com"), ("net", "whois.verisign-grs.com")];

/// Human-readable context for one scoring category.
pub struct CategoryDetail {
    pub category: Category,
    /// What the probe looks at and what raises the score.
    pub description: &'static str,
    /// The largest partial score the category can contribute.
    pub max_score: f64,
}

static CATEGORY_DETAILS: &[CategoryDetail] = &[
    CategoryDetail {
        category: Category::Blacklist,
        description: "Checks the URL against Google Safe Browsing and the hostname against a local list of known phishing domains. A hit on either list adds 2 points.",
        max_score: 2.0,
    },
    CategoryDetail {
        category: Category::Heuristic,
        description: "Looks for lexical red flags in the URL: digits (0.5), more than three dots (1.5) and the symbols @ % $ ! (1.0).",
        max_score: 3.0,
    },
    CategoryDetail {
        category: Category::Whois,
        description: "Queries the registry for the domain's creation date. Domains younger than 30 days add 1 point; an unknown age adds 0.5. Only .com and .net are supported.",
        max_score: 1.0,
    },
    CategoryDetail {
        category: Category::Certificate,
        description: "Inspects the TLS certificate on port 443. A missing certificate adds 2, an expired one adds 2, and the issuer's reputation adds up to 1.",
        max_score: 4.0,
    },
    CategoryDetail {
        category: Category::Similarity,
        description: "Measures the edit distance between the hostname and well-known brand domains. A one-character typo adds 2; several close brands add 1.5; a single close brand adds 1.",
        max_score: 2.0,
    },
    CategoryDetail {
        category: Category::Content,
        description: "Fetches the page and inspects its forms. Any form adds 0.5; a form asking for a password or login adds 2.",
        max_score: 2.5,
    },
    CategoryDetail {
        category: Category::Redirect,
        description: "Follows redirects from the URL. A chain of more than one hop adds 1 point.",
        max_score: 1.0,
    },
    CategoryDetail {
        category: Category::DynamicDns,
        description: "Flags hostnames served by dynamic-DNS providers (no-ip, duckdns, ...), which adds 1 point.",
        max_score: 1.0,
    },
];

/// Retrieves the description of a category from the static knowledge base.
pub fn get_category_detail(category: Category) -> Option<&'static CategoryDetail> {
    CATEGORY_DETAILS.iter().find(|d| d.category == category)
}

/// Looks up the WHOIS server responsible for a TLD.
pub fn whois_server_for(tld: &str) -> Option<&'static str> {
    WHOIS_SERVERS.iter().find(|(t, _)| *t == tld).map(|(_, server)| *server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_category_has_a_detail() {
        for category in Category::iter() {
            assert!(get_category_detail(category).is_some(), "missing detail for {category}");
        }
    }

    #[test]
    fn whitelist_has_twenty_entries() {
        assert_eq!(TRUSTED_WHITELIST.len(), 20);
        assert!(TRUSTED_WHITELIST.contains("zoom.us"));
    }

    #[test]
    fn whois_servers_cover_com_and_net_only() {
        assert_eq!(whois_server_for("com"), Some("whois.verisign-grs.com"));
        assert_eq!(whois_server_for("net"), Some("whois.verisign-grs.com"));
        assert_eq!(whois_server_for("org"), None);
    }
}
