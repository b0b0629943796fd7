use crate::models::{Listing, Product};

/// Score of one signal (0-100) with a human-readable reason
#[derive(Debug, Clone, PartialEq)]
pub struct SignalScore {
    pub score: f64,
    pub reason: String,
}

impl SignalScore {
    pub fn new(score: f64, reason: impl Into<String>) -> Self {
        Self {
            score: score.clamp(0.0, 100.0),
            reason: reason.into(),
        }
    }

    pub fn pass(reason: impl Into<String>) -> Self {
        Self::new(100.0, reason)
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self::new(0.0, reason)
    }
}

/// A single independent signal evaluated for a (listing, product) pair
///
/// Implementations must be pure: the same inputs always give the same score.
pub trait SignalMatcher: Send + Sync + std::fmt::Debug {
    fn score(&self, listing: &Listing, product: &Product) -> SignalScore;
}
