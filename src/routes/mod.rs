//! Routers HTTP
//!
//! `create_app_router` monta todos los routers, las capas de CORS y de
//! trazas, y los endpoints sueltos de salud y precio de combustible.

pub mod optimization_routes;
pub mod route_routes;

use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::dto::optimization_dto::FuelPriceResponse;
use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

pub fn create_app_router(state: AppState) -> Router {
    let cors = cors_middleware(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .route("/api/fuel-price", get(fuel_price))
        .nest("/api/optimize", optimization_routes::create_optimization_router())
        .nest("/api/routes", route_routes::create_route_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn fuel_price(State(state): State<AppState>) -> Json<FuelPriceResponse> {
    Json(FuelPriceResponse {
        price: state.orchestrator.default_fuel_price(),
    })
}
