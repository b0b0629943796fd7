use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use thiserror::Error;
use crate::models::Product;

/// Filter type whose keywords hard-reject listings
pub const AVOID_FILTER: &str = "avoid";

/// Keywords grouped by filter type, e.g. `{"avoid": ["broken", "faulty"]}`
pub type FilterKeywords = BTreeMap<String, Vec<String>>;

/// Errors that can occur when loading or querying the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid product {id}: {reason}")]
    InvalidProduct { id: i64, reason: String },

    #[error("Duplicate product id: {0}")]
    DuplicateProduct(i64),

    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),
}

/// Source of products and global filter keywords
pub trait CatalogStore: Send + Sync + std::fmt::Debug {
    /// Active products of one brand, ordered by model
    fn active_products_by_brand(&self, brand: &str) -> Result<Vec<Product>, CatalogError>;

    fn all_active_products(&self) -> Result<Vec<Product>, CatalogError>;

    /// Distinct brands that have at least one active product
    fn brands(&self) -> Result<Vec<String>, CatalogError>;

    fn filter_keywords(&self) -> Result<FilterKeywords, CatalogError>;
}

/// On-disk catalog layout (TOML or JSON)
///
/// ```toml
/// [[products]]
/// id = 1
/// brand = "Canon"
/// model = "EOS 90D"
/// full_name = "Canon EOS 90D"
/// buy_price_min = 300
/// buy_price_max = 600
/// sell_target = 700
/// aliases = ["90D"]
///
/// [filter_keywords]
/// avoid = ["broken", "parts only"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub filter_keywords: FilterKeywords,
}

/// Catalog held in memory, typically loaded from a file at startup
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
    filter_keywords: FilterKeywords,
}

impl InMemoryCatalog {
    /// Validate and index a set of products
    pub fn new(products: Vec<Product>, filter_keywords: FilterKeywords) -> Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        for product in &products {
            validate_product(product)?;
            if !ids.insert(product.id) {
                return Err(CatalogError::DuplicateProduct(product.id));
            }
        }

        let filter_keywords = filter_keywords
            .into_iter()
            .map(|(filter_type, mut keywords)| {
                keywords.sort();
                keywords.dedup();
                (filter_type, keywords)
            })
            .collect();

        Ok(Self { products, filter_keywords })
    }

    /// Load a `.toml` or `.json` catalog file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let file = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::parse_toml(&contents)?,
            Some("json") => Self::parse_json(&contents)?,
            other => {
                return Err(CatalogError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        let catalog = Self::new(file.products, file.filter_keywords)?;
        tracing::info!(
            "Loaded catalog from {}: {} products, {} filter types",
            path.display(),
            catalog.products.len(),
            catalog.filter_keywords.len()
        );
        Ok(catalog)
    }

    pub fn parse_toml(contents: &str) -> Result<CatalogFile, CatalogError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn parse_json(contents: &str) -> Result<CatalogFile, CatalogError> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn validate_product(product: &Product) -> Result<(), CatalogError> {
    let invalid = |reason: &str| CatalogError::InvalidProduct {
        id: product.id,
        reason: reason.to_string(),
    };

    if product.full_name.trim().is_empty() {
        return Err(invalid("full_name is empty"));
    }
    if product.buy_price_min > product.buy_price_max {
        return Err(invalid("buy_price_min exceeds buy_price_max"));
    }
    if product.buy_price_min.is_sign_negative() {
        return Err(invalid("buy_price_min is negative"));
    }
    Ok(())
}

impl CatalogStore for InMemoryCatalog {
    fn active_products_by_brand(&self, brand: &str) -> Result<Vec<Product>, CatalogError> {
        let brand = brand.trim();
        let mut products: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.active && p.brand.eq_ignore_ascii_case(brand))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.model.cmp(&b.model));
        Ok(products)
    }

    fn all_active_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.iter().filter(|p| p.active).cloned().collect())
    }

    fn brands(&self) -> Result<Vec<String>, CatalogError> {
        let brands: BTreeSet<&str> = self
            .products
            .iter()
            .filter(|p| p.active)
            .map(|p| p.brand.as_str())
            .collect();
        Ok(brands.into_iter().map(str::to_string).collect())
    }

    fn filter_keywords(&self) -> Result<FilterKeywords, CatalogError> {
        Ok(self.filter_keywords.clone())
    }
}
