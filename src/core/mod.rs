// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod scoring;
pub mod signal;
pub mod stats;
pub mod title;

pub use filters::{PriceMatcher, KeywordFilter, dedupe_listings};
pub use matcher::{MatchingEngine, DEFAULT_MIN_CONFIDENCE};
pub use scoring::{ConfidenceCalculator, ScoringError, validate_threshold};
pub use signal::{SignalMatcher, SignalScore};
pub use stats::MatchStats;
pub use title::{TitleMatcher, TitleMatch, CandidateKind};
