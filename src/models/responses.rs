use serde::{Deserialize, Serialize};
use crate::core::MatchStats;
use crate::models::domain::MatchRecord;

/// Response for the match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchListingsResponse {
    pub run_id: String,
    pub matches: Vec<MatchRecord>,
    pub stats: MatchStats,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub catalog_products: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandsResponse {
    pub brands: Vec<String>,
}
