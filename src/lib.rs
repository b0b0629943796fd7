//! Resale Match - confidence-scored pairing of marketplace listings with a product catalog
//!
//! The core engine runs three independent signals (title similarity, buy-price
//! band, avoid keywords) over every listing × product pair, merges them into a
//! single confidence and keeps the pairs that clear the threshold.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{MatchingEngine, ConfidenceCalculator, ScoringError, SignalMatcher, SignalScore, MatchStats};
pub use crate::models::{Listing, Product, MatchResult, MatchRecord, ScoringWeights};
