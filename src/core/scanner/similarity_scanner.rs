// src/core/scanner/similarity_scanner.rs

use strsim::levenshtein;
use tracing::debug;

use crate::core::knowledge_base::{Brand, BRAND_REGISTRY};
use crate::core::models::{BrandDistance, SimilarityResult};

/// Measures the edit distance between the hostname and every registered brand domain.
pub fn run_similarity_scan(hostname: Option<&str>) -> SimilarityResult {
    match hostname {
        Some(hostname) => measure_against(hostname, BRAND_REGISTRY),
        None => SimilarityResult::default(),
    }
}

/// Case-sensitive Levenshtein distance from `hostname` to each brand, in registry order.
pub fn measure_against(hostname: &str, brands: &[Brand]) -> SimilarityResult {
    let per_brand_distance: Vec<BrandDistance> = brands
        .iter()
        .map(|brand| BrandDistance {
            brand: brand.name.to_string(),
            domain: brand.domain.to_string(),
            distance: levenshtein(hostname, brand.domain),
        })
        .collect();

    if let Some(closest) = per_brand_distance.iter().min_by_key(|b| b.distance) {
        debug!(hostname, brand = %closest.brand, distance = closest.distance, "Closest brand.");
    }
    SimilarityResult { per_brand_distance }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scoring::score_similarity;

    fn distance_to(result: &SimilarityResult, domain: &str) -> usize {
        result.per_brand_distance.iter().find(|b| b.domain == domain).unwrap().distance
    }

    #[test]
    fn one_typo_hits_the_top_tier() {
        let result = run_similarity_scan(Some("gogle.com"));
        assert_eq!(distance_to(&result, "google.com"), 1);
        assert_eq!(score_similarity(&result), 2.0);
    }

    #[test]
    fn cyrillic_homograph_hits_the_top_tier() {
        let subject = crate::core::models::UrlSubject::parse("http://p\u{0430}ypal.com/login");
        let result = run_similarity_scan(subject.unicode_hostname.as_deref());
        assert_eq!(distance_to(&result, "paypal.com"), 1);
        assert_eq!(score_similarity(&result), 2.0);
    }

    #[test]
    fn every_brand_is_measured_in_order() {
        let result = run_similarity_scan(Some("example.net"));
        assert_eq!(result.per_brand_distance.len(), BRAND_REGISTRY.len());
        assert_eq!(result.per_brand_distance[0].domain, BRAND_REGISTRY[0].domain);
    }

    #[test]
    fn distance_is_case_sensitive() {
        let brands = [Brand { name: "Google", domain: "google.com" }];
        assert_eq!(measure_against("Google.com", &brands).per_brand_distance[0].distance, 1);
    }

    #[test]
    fn no_hostname_measures_nothing() {
        assert!(run_similarity_scan(None).per_brand_distance.is_empty());
    }
}
