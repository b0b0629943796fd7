use thiserror::Error;
use crate::models::ScoringWeights;

/// Accepted range for the sum of the three weights
const WEIGHT_TOTAL_MIN: f64 = 0.99;
const WEIGHT_TOTAL_MAX: f64 = 1.01;

/// Errors raised while building a scorer from configuration
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("Weights must sum to 1.0, got {total}")]
    InvalidWeights { total: f64 },

    #[error("Weight '{name}' must be a finite non-negative number, got {value}")]
    NegativeWeight { name: &'static str, value: f64 },

    #[error("Confidence threshold must be within 0-100, got {0}")]
    InvalidThreshold(f64),
}

/// Combines title, price and keyword scores into one confidence value
///
/// Price and keyword act as hard gates: a zero on either forces confidence
/// to 0. Only when both pass does the weighted sum apply:
///
/// confidence = title * w_title + price * w_price + keyword * w_keyword
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceCalculator {
    weights: ScoringWeights,
}

impl ConfidenceCalculator {
    /// Fails unless every weight is non-negative and they sum to 1.0 ± 0.01
    pub fn new(weights: ScoringWeights) -> Result<Self, ScoringError> {
        for (name, value) in [
            ("title", weights.title),
            ("price", weights.price),
            ("keyword", weights.keyword),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::NegativeWeight { name, value });
            }
        }

        let total = weights.total();
        if !(WEIGHT_TOTAL_MIN..=WEIGHT_TOTAL_MAX).contains(&total) {
            return Err(ScoringError::InvalidWeights { total });
        }

        Ok(Self { weights })
    }

    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    /// Returns the confidence (0-100) and its breakdown lines
    pub fn calculate(
        &self,
        title_score: f64,
        price_score: f64,
        keyword_score: f64,
    ) -> (f64, Vec<String>) {
        if keyword_score == 0.0 {
            return (0.0, vec!["Rejected due to avoid keywords".to_string()]);
        }

        if price_score == 0.0 {
            return (0.0, vec!["Rejected due to price outside acceptable range".to_string()]);
        }

        let w = &self.weights;
        let confidence = title_score * w.title + price_score * w.price + keyword_score * w.keyword;

        let breakdown = vec![
            format!("Title: {:.0}% (weight {:.0}%)", title_score, w.title * 100.0),
            format!("Price: {:.0}% (weight {:.0}%)", price_score, w.price * 100.0),
            format!("Keywords: {:.0}% (weight {:.0}%)", keyword_score, w.keyword * 100.0),
        ];

        tracing::debug!("Confidence: {:.1}% - {}", confidence, breakdown.join(" | "));

        (confidence.clamp(0.0, 100.0), breakdown)
    }
}

impl Default for ConfidenceCalculator {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }
}

/// Ensure a confidence threshold lies in [0, 100]
pub fn validate_threshold(threshold: f64) -> Result<f64, ScoringError> {
    if threshold.is_finite() && (0.0..=100.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(ScoringError::InvalidThreshold(threshold))
    }
}
