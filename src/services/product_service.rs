use std::sync::Arc;
use crate::models::Product;
use crate::services::catalog::{CatalogError, CatalogStore, AVOID_FILTER};

/// Catalog lookups used by the matching routes
#[derive(Debug, Clone)]
pub struct ProductService {
    catalog: Arc<dyn CatalogStore>,
}

impl ProductService {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    pub fn products_for_brand(&self, brand: &str) -> Result<Vec<Product>, CatalogError> {
        tracing::info!("Fetching products for brand: {}", brand);
        let products = self.catalog.active_products_by_brand(brand)?;
        tracing::info!("Found {} products for {}", products.len(), brand);
        Ok(products)
    }

    /// Global avoid keywords; empty when the catalog defines none
    pub fn avoid_keywords(&self) -> Result<Vec<String>, CatalogError> {
        let mut keywords = self.catalog.filter_keywords()?;
        let avoid = keywords.remove(AVOID_FILTER).unwrap_or_default();
        tracing::info!("Loaded {} avoid keywords", avoid.len());
        Ok(avoid)
    }

    pub fn brands(&self) -> Result<Vec<String>, CatalogError> {
        self.catalog.brands()
    }

    pub fn active_product_count(&self) -> Result<usize, CatalogError> {
        Ok(self.catalog.all_active_products()?.len())
    }
}
