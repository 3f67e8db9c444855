// HTTP API tests for the catalog search service

use actix_web::{test, web, App};
use product_map::core::Catalog;
use product_map::models::{CatalogEntry, ErrorResponse, HealthResponse, LatLng, SearchResponse};
use product_map::routes::{configure_routes, handle_query_payload_error, search::AppState};
use std::sync::Arc;

fn entry(title: &str, popularity: f64, lat: f64, lng: f64, tags: &[&str]) -> CatalogEntry {
    CatalogEntry {
        title: title.to_string(),
        popularity,
        shop: LatLng::new(lat, lng),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn state() -> AppState {
    AppState {
        catalog: Arc::new(Catalog::new(vec![
            entry("Kanelbulle", 0.9, 59.3330, 18.0660, &["bakery", "coffee"]),
            entry("Cortado", 0.8, 59.3318, 18.0628, &["coffee"]),
            entry("Sencha", 0.3, 59.3320, 18.0640, &["tea"]),
            entry("Uppsala bun", 1.0, 59.8586, 17.6389, &["bakery"]),
        ])),
        max_count: 50,
    }
}

macro_rules! service {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health() {
    let app = service!();
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: HealthResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.status, "healthy");
    assert_eq!(body.products, 4);
}

#[actix_web::test]
async fn test_search_returns_nearby_products() {
    let app = service!();
    let req = test::TestRequest::get()
        .uri("/api/search?lat=59.33258&lng=18.0649&radius=500&count=10")
        .to_request();
    let body: SearchResponse = test::call_and_read_body_json(&app, req).await;

    let titles: Vec<_> = body.products.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Kanelbulle", "Cortado", "Sencha"]);
}

#[actix_web::test]
async fn test_search_with_tags_and_count() {
    let app = service!();
    let req = test::TestRequest::get()
        .uri("/api/search?lat=59.33258&lng=18.0649&radius=500&count=1&tags=coffee")
        .to_request();
    let body: SearchResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.products.len(), 1);
    assert_eq!(body.products[0].title, "Kanelbulle");
}

#[actix_web::test]
async fn test_search_defaults_radius_and_count() {
    let app = service!();
    let req = test::TestRequest::get()
        .uri("/api/search?lat=59.33258&lng=18.0649&tags=tea")
        .to_request();
    let body: SearchResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.products.len(), 1);
    assert_eq!(body.products[0].title, "Sencha");
}

#[actix_web::test]
async fn test_search_nothing_nearby_is_empty() {
    let app = service!();
    let req = test::TestRequest::get()
        .uri("/api/search?lat=0.0&lng=0.0&radius=500")
        .to_request();
    let body: SearchResponse = test::call_and_read_body_json(&app, req).await;

    assert!(body.products.is_empty());
}

#[actix_web::test]
async fn test_invalid_latitude_rejected() {
    let app = service!();
    let req = test::TestRequest::get()
        .uri("/api/search?lat=123.0&lng=18.0")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.status_code, 400);
}

#[actix_web::test]
async fn test_count_above_maximum_rejected() {
    let app = service!();
    let req = test::TestRequest::get()
        .uri("/api/search?lat=59.3&lng=18.0&count=51")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_malformed_query_rejected() {
    let app = service!();
    let req = test::TestRequest::get()
        .uri("/api/search?lat=north&lng=18.0")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "invalid_query");
}
