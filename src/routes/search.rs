use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::Catalog;
use crate::models::{SearchQuery, SearchResponse, HealthResponse, ErrorResponse};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub max_count: u32,
}

/// Configure all search-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/search", web::get().to(search));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        products: state.catalog.len(),
        timestamp: chrono::Utc::now(),
    })
}

/// Product search endpoint
///
/// GET /api/search?lat=59.33&lng=18.06&radius=500&count=10&tags=coffee,bakery
///
/// Response body:
/// ```json
/// {
///   "products": [
///     { "title": "string", "popularity": 0.5, "shop": { "lat": 0.0, "lng": 0.0 } }
///   ]
/// }
/// ```
async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    if query.count > state.max_count {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: format!("count must not exceed {}", state.max_count),
            status_code: 400,
        });
    }

    let catalog_query = query.to_catalog_query();
    let result = state.catalog.search(&catalog_query);

    tracing::info!(
        "Returning {} products within {}m of {} (from {} candidates)",
        result.products.len(),
        catalog_query.radius_meters,
        catalog_query.origin,
        result.total_candidates
    );

    HttpResponse::Ok().json(SearchResponse {
        products: result.products,
    })
}
