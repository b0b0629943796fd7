// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Listing, Product, MatchResult, MatchRecord, ListingSummary, ProductSummary, ScoringWeights, normalize_text, parse_price};
pub use requests::MatchListingsRequest;
pub use responses::{MatchListingsResponse, HealthResponse, ErrorResponse, BrandsResponse};
