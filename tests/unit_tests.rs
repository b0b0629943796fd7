// Unit tests for Resale Match

use resale_match::core::{
    filters::{KeywordFilter, PriceMatcher},
    scoring::ConfidenceCalculator,
    title::{similarity, TitleMatcher},
    SignalMatcher,
};
use resale_match::models::{Listing, Product, ScoringWeights};
use rust_decimal_macros::dec;

fn camera() -> Product {
    Product {
        id: 10,
        brand: "Fujifilm".to_string(),
        model: "X-T3".to_string(),
        full_name: "Fujifilm X-T3".to_string(),
        category: "camera".to_string(),
        buy_price_min: dec!(400),
        buy_price_max: dec!(650),
        sell_target: dec!(800),
        active: true,
        fuzzy_patterns: vec!["fuji xt3".to_string()],
        aliases: vec!["X-T3".to_string()],
    }
}

#[test]
fn test_weights_summing_to_half_rejected() {
    let weights = ScoringWeights { title: 0.3, price: 0.1, keyword: 0.1 };
    assert!(ConfidenceCalculator::new(weights).is_err());
}

#[test]
fn test_weights_summing_to_one_and_a_half_rejected() {
    let weights = ScoringWeights { title: 0.9, price: 0.4, keyword: 0.2 };
    assert!(ConfidenceCalculator::new(weights).is_err());
}

#[test]
fn test_weights_near_one_accepted() {
    let exact = ScoringWeights { title: 0.6, price: 0.3, keyword: 0.1 };
    let slightly_low = ScoringWeights { title: 0.591, price: 0.3, keyword: 0.1 };
    assert!(ConfidenceCalculator::new(exact).is_ok());
    assert!(ConfidenceCalculator::new(slightly_low).is_ok());
}

#[test]
fn test_keyword_reject_dominates() {
    let calc = ConfidenceCalculator::new(ScoringWeights::default()).unwrap();
    for title in [0.0, 35.0, 100.0] {
        for price in [0.0, 100.0] {
            assert_eq!(calc.calculate(title, price, 0.0).0, 0.0);
        }
    }
}

#[test]
fn test_price_reject_when_keywords_clean() {
    let calc = ConfidenceCalculator::new(ScoringWeights::default()).unwrap();
    for title in [0.0, 35.0, 100.0] {
        assert_eq!(calc.calculate(title, 0.0, 100.0).0, 0.0);
    }
}

#[test]
fn test_title_matcher_uses_fuzzy_pattern() {
    let listing = Listing::new("u", "Fuji XT3 + 18-55mm lens", Some(dec!(500)));
    let score = TitleMatcher::new().score(&listing, &camera());
    assert_eq!(score.score, 100.0);
    assert!(score.reason.contains("fuzzy pattern 'fuji xt3'"), "{}", score.reason);
}

#[test]
fn test_title_matcher_is_deterministic() {
    let listing = Listing::new("u", "Fujifim XT-3 body only", Some(dec!(500)));
    let first = TitleMatcher::new().score(&listing, &camera());
    let second = TitleMatcher::new().score(&listing, &camera());
    assert_eq!(first, second);
}

#[test]
fn test_similarity_range() {
    let s = similarity("fujifilm x t3 body", "fujifilm x t3");
    assert!(s > 0.0 && s <= 1.0);
    assert_eq!(similarity("lawn mower", "fujifilm x t3"), 0.0);
}

#[test]
fn test_price_matcher_without_price() {
    let listing = Listing::new("u", "Fujifilm X-T3", None);
    let score = PriceMatcher::new().score(&listing, &camera());
    assert_eq!(score.score, 0.0);
    assert_eq!(score.reason, "no price available");
}

#[test]
fn test_keyword_filter_is_product_independent() {
    let filter = KeywordFilter::new(["spares or repair"]);
    let listing = Listing::new("u", "Fujifilm X-T3 SPARES OR REPAIR", Some(dec!(450)));
    let mut other = camera();
    other.id = 11;
    other.full_name = "Something else".to_string();

    assert_eq!(filter.score(&listing, &camera()).score, 0.0);
    assert_eq!(filter.score(&listing, &other).score, 0.0);
}
