// src/core/scanner/dynamic_dns_scanner.rs

use tracing::debug;

use crate::core::knowledge_base::DYNAMIC_DNS_PROVIDERS;
use crate::core::models::DynamicDnsResult;

/// Flags hostnames that contain a known dynamic-DNS provider fragment.
pub fn run_dynamic_dns_scan(hostname: Option<&str>) -> DynamicDnsResult {
    let Some(hostname) = hostname else {
        return DynamicDnsResult::default();
    };

    let provider = DYNAMIC_DNS_PROVIDERS.iter().find(|p| hostname.contains(*p));
    if let Some(provider) = provider {
        debug!(hostname, provider, "Hostname uses a dynamic-DNS provider.");
    }
    DynamicDnsResult { is_dynamic: provider.is_some() }
}
