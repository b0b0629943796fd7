// HTTP API tests for Resale Match

use actix_web::{http::StatusCode, test, web, App};
use resale_match::core::MatchingEngine;
use resale_match::models::{HealthResponse, MatchListingsResponse};
use resale_match::routes::{self, AppState};
use resale_match::services::{CatalogStore, InMemoryCatalog, ProductService};
use serde_json::json;
use std::sync::Arc;

const CATALOG: &str = r#"
[[products]]
id = 1
brand = "Canon"
model = "EOS 90D"
full_name = "Canon EOS 90D"
buy_price_min = 300
buy_price_max = 600
sell_target = 700

[[products]]
id = 2
brand = "Nikon"
model = "Z6"
full_name = "Nikon Z6"
buy_price_min = 500
buy_price_max = 800
sell_target = 1000

[filter_keywords]
avoid = ["broken"]
"#;

fn state(with_catalog: bool) -> AppState {
    let products = with_catalog.then(|| {
        let file = InMemoryCatalog::parse_toml(CATALOG).unwrap();
        let catalog: Arc<dyn CatalogStore> =
            Arc::new(InMemoryCatalog::new(file.products, file.filter_keywords).unwrap());
        ProductService::new(catalog)
    });

    AppState {
        engine: MatchingEngine::default(),
        products,
        max_listings: 3,
    }
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(routes::json_config())
                .configure(routes::configure_routes),
        )
        .await
    };
}

fn eos_product() -> serde_json::Value {
    json!({
        "id": 1,
        "brand": "Canon",
        "model": "EOS 90D",
        "full_name": "Canon EOS 90D",
        "buy_price_min": 300,
        "buy_price_max": 600,
        "sell_target": 700
    })
}

#[actix_web::test]
async fn test_health() {
    let app = app!(state(true));
    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: HealthResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.status, "healthy");
    assert_eq!(body.catalog_products, 2);
}

#[actix_web::test]
async fn test_match_with_inline_products() {
    let app = app!(state(false));
    let payload = json!({
        "listings": [
            {"url": "https://market.example/1", "title": "Canon EOS 90D body", "price": "£450"},
            {"url": "https://market.example/2", "title": "Canon EOS 90D broken", "price": 400},
            {"url": "https://market.example/1", "title": "duplicate", "price": 450}
        ],
        "products": [eos_product()],
        "avoid_keywords": ["broken"]
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/matches")
        .set_json(&payload)
        .to_request();
    let body: MatchListingsResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.matches.len(), 1);
    let record = &body.matches[0];
    assert_eq!(record.listing.url, "https://market.example/1");
    assert_eq!(record.product.id, 1);
    assert_eq!(record.confidence, 100.0);
    assert_eq!(body.stats.listings_evaluated, 2);
    assert_eq!(body.stats.total_matches, 1);
    assert!(!body.run_id.is_empty());
}

#[actix_web::test]
async fn test_match_with_catalog_brand() {
    let app = app!(state(true));
    let payload = json!({
        "listings": [
            {"url": "a", "title": "Canon EOS 90D", "price": 450},
            {"url": "b", "title": "Canon EOS 90D broken screen", "price": 450}
        ],
        "brand": "canon"
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/matches")
        .set_json(&payload)
        .to_request();
    let body: MatchListingsResponse = test::call_and_read_body_json(&app, req).await;

    let urls: Vec<&str> = body.matches.iter().map(|m| m.listing.url.as_str()).collect();
    assert_eq!(urls, vec!["a"]);
}

#[actix_web::test]
async fn test_missing_products_and_brand() {
    let app = app!(state(true));
    let payload = json!({"listings": [{"url": "a", "title": "Canon EOS 90D", "price": 450}]});

    let req = test::TestRequest::post()
        .uri("/api/v1/matches")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_too_many_listings() {
    let app = app!(state(false));
    let listings: Vec<serde_json::Value> = (0..4)
        .map(|i| json!({"url": format!("u{}", i), "title": "Canon EOS 90D", "price": 450}))
        .collect();
    let payload = json!({"listings": listings, "products": [eos_product()]});

    let req = test::TestRequest::post()
        .uri("/api/v1/matches")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_invalid_json() {
    let app = app!(state(false));
    let req = test::TestRequest::post()
        .uri("/api/v1/matches")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_brands() {
    let app = app!(state(true));
    let req = test::TestRequest::get().uri("/api/v1/brands").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["brands"], json!(["Canon", "Nikon"]));
}

#[actix_web::test]
async fn test_malformed_listing_does_not_fail_batch() {
    let app = app!(state(false));
    let payload = json!({
        "listings": [
            {"url": "bad", "title": null, "price": "call me", "location": 123, "image_url": {"a": 1}},
            {"url": "good", "title": "Canon EOS 90D body", "price": 450, "location": "Leeds"}
        ],
        "products": [eos_product()]
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/matches")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: MatchListingsResponse = test::read_body_json(resp).await;
    let urls: Vec<&str> = body.matches.iter().map(|m| m.listing.url.as_str()).collect();
    assert_eq!(urls, vec!["good"]);
    assert_eq!(body.matches[0].listing.location.as_deref(), Some("Leeds"));
    assert_eq!(body.stats.listings_evaluated, 2);
    assert_eq!(body.stats.unmatched_listings, 1);
}

#[actix_web::test]
async fn test_price_text_uses_first_amount() {
    let app = app!(state(false));
    let payload = json!({
        "listings": [
            {"url": "a", "title": "Canon EOS 90D", "price": "£4 (was £50)"},
            {"url": "b", "title": "Canon EOS 90D", "price": "£450 (was £600)"}
        ],
        "products": [eos_product()]
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/matches")
        .set_json(&payload)
        .to_request();
    let body: MatchListingsResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.matches.len(), 1);
    assert_eq!(body.matches[0].listing.url, "b");
    assert_eq!(body.matches[0].potential_profit, Some(rust_decimal::Decimal::from(250)));
}
