// Service exports
pub mod catalog;
pub mod product_service;

pub use catalog::{CatalogStore, CatalogFile, CatalogError, InMemoryCatalog, FilterKeywords, AVOID_FILTER};
pub use product_service::ProductService;
