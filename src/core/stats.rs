use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use crate::models::{Listing, MatchResult};

/// Summary of one matching run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub listings_evaluated: usize,
    pub total_matches: usize,
    pub unique_listings_matched: usize,
    pub unmatched_listings: usize,
    pub average_confidence: f64,
    pub products_with_matches: usize,
    pub matches_per_product: BTreeMap<i64, usize>,
}

impl MatchStats {
    pub fn compute(listings: &[Listing], matches: &[MatchResult<'_>]) -> Self {
        let mut matches_per_product = BTreeMap::new();
        for m in matches {
            *matches_per_product.entry(m.product().id).or_insert(0) += 1;
        }

        let average_confidence = if matches.is_empty() {
            0.0
        } else {
            let sum: f64 = matches.iter().map(|m| m.confidence()).sum();
            let avg = sum / matches.len() as f64;
            (avg * 100.0).round() / 100.0
        };

        let matched_urls: HashSet<&str> = matches.iter().map(|m| m.listing().url.as_str()).collect();
        let unmatched_listings = listings
            .iter()
            .filter(|l| !matched_urls.contains(l.url.as_str()))
            .count();

        Self {
            listings_evaluated: listings.len(),
            total_matches: matches.len(),
            unique_listings_matched: matched_urls.len(),
            unmatched_listings,
            average_confidence,
            products_with_matches: matches_per_product.len(),
            matches_per_product,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MatchingEngine;
    use crate::models::Product;
    use rust_decimal_macros::dec;

    fn product(id: i64, model: &str) -> Product {
        Product {
            id,
            brand: "Fender".to_string(),
            model: model.to_string(),
            full_name: format!("Fender {}", model),
            category: "guitar".to_string(),
            buy_price_min: dec!(200),
            buy_price_max: dec!(800),
            sell_target: dec!(1000),
            active: true,
            fuzzy_patterns: vec![],
            aliases: vec![],
        }
    }

    #[test]
    fn test_stats_for_run() {
        let engine = MatchingEngine::default();
        let products = vec![product(1, "Stratocaster"), product(2, "Telecaster")];
        let listings = vec![
            Listing::new("a", "Fender Stratocaster sunburst", Some(dec!(500))),
            Listing::new("b", "Fender Telecaster", Some(dec!(600))),
            Listing::new("c", "Fender Stratocaster MIM", Some(dec!(400))),
            Listing::new("d", "Bicycle", Some(dec!(300))),
        ];

        let matches = engine.match_listings(&listings, &products);
        let stats = MatchStats::compute(&listings, &matches);

        assert_eq!(stats.listings_evaluated, 4);
        assert_eq!(stats.total_matches, 3);
        assert_eq!(stats.unique_listings_matched, 3);
        assert_eq!(stats.unmatched_listings, 1);
        assert_eq!(stats.products_with_matches, 2);
        assert_eq!(stats.matches_per_product.get(&1), Some(&2));
        assert_eq!(stats.matches_per_product.get(&2), Some(&1));
        assert_eq!(stats.average_confidence, 100.0);
    }

    #[test]
    fn test_stats_empty_run() {
        let stats = MatchStats::compute(&[], &[]);
        assert_eq!(stats.total_matches, 0);
        assert_eq!(stats.average_confidence, 0.0);
        assert!(stats.matches_per_product.is_empty());
    }
}
