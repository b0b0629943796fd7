use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{Listing, Product};

/// Request to match a batch of listings
///
/// Products and avoid keywords may be supplied inline; when absent they are
/// looked up in the configured catalog (products by `brand`).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchListingsRequest {
    pub listings: Vec<Listing>,
    #[serde(default)]
    pub products: Option<Vec<Product>>,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, alias = "avoidKeywords")]
    pub avoid_keywords: Option<Vec<String>>,
}
