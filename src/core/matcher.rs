use rayon::prelude::*;
use std::sync::Arc;
use crate::core::{
    filters::{KeywordFilter, PriceMatcher},
    scoring::{validate_threshold, ConfidenceCalculator, ScoringError},
    signal::SignalMatcher,
    title::TitleMatcher,
};
use crate::models::{Listing, MatchResult, Product, ScoringWeights};

/// Confidence a pairing must reach to be reported
pub const DEFAULT_MIN_CONFIDENCE: f64 = 70.0;

/// Main matching orchestrator
///
/// # Pipeline
/// For every (listing, product) pair:
/// 1. Title, price and keyword signals are scored independently
/// 2. The confidence calculator merges them (price/keyword are hard gates)
/// 3. Pairs below the confidence threshold are dropped
/// 4. Survivors are ranked by confidence, ties kept in product input order
///
/// The engine holds only read-only configuration and can be reused across
/// batches and shared between threads.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    title: Arc<dyn SignalMatcher>,
    price: Arc<dyn SignalMatcher>,
    keyword: Arc<dyn SignalMatcher>,
    calculator: ConfidenceCalculator,
    min_confidence: f64,
}

impl MatchingEngine {
    /// Build an engine, failing on invalid weights or threshold
    pub fn new<I, S>(
        weights: ScoringWeights,
        min_confidence: f64,
        avoid_keywords: I,
    ) -> Result<Self, ScoringError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let calculator = ConfidenceCalculator::new(weights)?;
        Self::from_parts(
            calculator,
            min_confidence,
            Arc::new(TitleMatcher::new()),
            Arc::new(PriceMatcher::new()),
            Arc::new(KeywordFilter::new(avoid_keywords)),
        )
    }

    /// Default weights (0.6 / 0.3 / 0.1) and a 70% threshold
    pub fn with_default_weights<I, S>(avoid_keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            title: Arc::new(TitleMatcher::new()),
            price: Arc::new(PriceMatcher::new()),
            keyword: Arc::new(KeywordFilter::new(avoid_keywords)),
            calculator: ConfidenceCalculator::default(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    /// Assemble an engine from arbitrary signal matchers
    pub fn from_parts(
        calculator: ConfidenceCalculator,
        min_confidence: f64,
        title: Arc<dyn SignalMatcher>,
        price: Arc<dyn SignalMatcher>,
        keyword: Arc<dyn SignalMatcher>,
    ) -> Result<Self, ScoringError> {
        Ok(Self {
            title,
            price,
            keyword,
            calculator,
            min_confidence: validate_threshold(min_confidence)?,
        })
    }

    /// Same weights and threshold, different avoid-keyword list
    pub fn with_avoid_keywords<I, S>(&self, avoid_keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keyword: Arc::new(KeywordFilter::new(avoid_keywords)),
            ..self.clone()
        }
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    pub fn weights(&self) -> ScoringWeights {
        self.calculator.weights()
    }

    #[inline]
    pub fn meets_threshold(&self, confidence: f64) -> bool {
        confidence >= self.min_confidence
    }

    /// Match one listing against every product
    ///
    /// Returns only pairings at or above the threshold, sorted by confidence
    /// descending. Equal confidences keep the order of `products`.
    pub fn match_listing<'a>(
        &self,
        listing: &'a Listing,
        products: &'a [Product],
    ) -> Vec<MatchResult<'a>> {
        let mut results: Vec<MatchResult<'a>> = products
            .par_iter()
            .map(|product| self.score_pair(listing, product))
            .collect();

        results.retain(|r| self.meets_threshold(r.confidence()));

        // Vec::sort_by is stable
        results.sort_by(|a, b| b.confidence().total_cmp(&a.confidence()));

        tracing::debug!(
            "Matched listing '{}' - found {} matches above {}%",
            listing.title.chars().take(50).collect::<String>(),
            results.len(),
            self.min_confidence
        );

        results
    }

    /// Match every listing, concatenating per-listing results in input order
    pub fn match_listings<'a>(
        &self,
        listings: &'a [Listing],
        products: &'a [Product],
    ) -> Vec<MatchResult<'a>> {
        let per_listing: Vec<Vec<MatchResult<'a>>> = listings
            .par_iter()
            .map(|listing| self.match_listing(listing, products))
            .collect();

        let results: Vec<MatchResult<'a>> = per_listing.into_iter().flatten().collect();

        tracing::info!(
            "Matched {} listings against {} products - found {} total matches",
            listings.len(),
            products.len(),
            results.len()
        );

        results
    }

    fn score_pair<'a>(&self, listing: &'a Listing, product: &'a Product) -> MatchResult<'a> {
        let title = self.title.score(listing, product);
        let price = self.price.score(listing, product);
        let keyword = self.keyword.score(listing, product);

        let (confidence, breakdown) = self
            .calculator
            .calculate(title.score, price.score, keyword.score);

        let mut reasons = Vec::with_capacity(3 + breakdown.len());
        reasons.push(title.reason);
        reasons.push(price.reason);
        reasons.push(keyword.reason);
        reasons.extend(breakdown);

        MatchResult::new(listing, product, confidence, reasons)
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::with_default_weights(Vec::<String>::new())
    }
}
