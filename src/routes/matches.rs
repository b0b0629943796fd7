use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{dedupe_listings, MatchStats, MatchingEngine};
use crate::models::{BrandsResponse, ErrorResponse, HealthResponse, MatchListingsRequest, MatchListingsResponse, MatchRecord};
use crate::services::ProductService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: MatchingEngine,
    pub products: Option<ProductService>,
    pub max_listings: usize,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/brands", web::get().to(list_brands))
        .route("/matches", web::post().to(match_listings));
}

fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status.as_u16(),
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let catalog_products = match &state.products {
        Some(service) => service.active_product_count().unwrap_or_else(|e| {
            tracing::warn!("Failed to count catalog products: {}", e);
            0
        }),
        None => 0,
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        catalog_products,
    })
}

/// Brands with active catalog products
///
/// GET /api/v1/brands
async fn list_brands(state: web::Data<AppState>) -> impl Responder {
    let Some(service) = &state.products else {
        return HttpResponse::Ok().json(BrandsResponse { brands: vec![] });
    };

    match service.brands() {
        Ok(brands) => HttpResponse::Ok().json(BrandsResponse { brands }),
        Err(e) => {
            tracing::error!("Failed to list brands: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list brands", e.to_string())
        }
    }
}

/// Match a batch of listings
///
/// POST /api/v1/matches
///
/// Request body:
/// ```json
/// {
///   "listings": [{"url": "...", "title": "...", "price": 450}],
///   "products": [...],
///   "brand": "Canon",
///   "avoid_keywords": ["broken"]
/// }
/// ```
/// `products` falls back to the catalog (by `brand`), `avoid_keywords` to the
/// catalog's global avoid list.
async fn match_listings(
    state: web::Data<AppState>,
    req: web::Json<MatchListingsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let req = req.into_inner();

    if req.listings.len() > state.max_listings {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Too many listings",
            format!("At most {} listings per request, got {}", state.max_listings, req.listings.len()),
        );
    }

    let products = match (req.products, &req.brand, &state.products) {
        (Some(products), _, _) => products,
        (None, Some(brand), Some(service)) => match service.products_for_brand(brand) {
            Ok(products) => products,
            Err(e) => {
                tracing::error!("Failed to fetch products for {}: {}", brand, e);
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch products",
                    e.to_string(),
                );
            }
        },
        (None, Some(_), None) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Catalog not configured",
                "Supply products inline or configure catalog.path",
            );
        }
        (None, None, _) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Missing products",
                "Either products or brand is required",
            );
        }
    };

    let avoid_keywords = match (req.avoid_keywords, &state.products) {
        (Some(keywords), _) => keywords,
        (None, Some(service)) => match service.avoid_keywords() {
            Ok(keywords) => keywords,
            Err(e) => {
                tracing::error!("Failed to fetch avoid keywords: {}", e);
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch avoid keywords",
                    e.to_string(),
                );
            }
        },
        (None, None) => vec![],
    };

    let received = req.listings.len();
    let listings = dedupe_listings(req.listings);
    if listings.len() < received {
        tracing::debug!("Dropped {} duplicate or unidentified listings", received - listings.len());
    }

    let engine: MatchingEngine = state.engine.with_avoid_keywords(&avoid_keywords);
    let results = engine.match_listings(&listings, &products);

    let response = MatchListingsResponse {
        run_id: uuid::Uuid::new_v4().to_string(),
        stats: MatchStats::compute(&listings, &results),
        matches: results.iter().map(|r| r.to_record()).collect::<Vec<MatchRecord>>(),
    };

    tracing::info!(
        "Run {}: {} matches from {} listings x {} products",
        response.run_id,
        response.matches.len(),
        listings.len(),
        products.len()
    );

    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status() {
        let response = error_response(StatusCode::BAD_REQUEST, "Missing products", "x");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
