//! Motor de estado y progreso de rutas
//!
//! Ubica cada unidad de la flotilla en el paso (geocerca) o en el tramo de
//! traslado donde se encuentra, clasifica su retraso contra la hora
//! estimada de llegada y resume el peor estado por paso.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::dto::progress_dto::HealthResponse;
use crate::middleware::cors::cors_for;
use crate::routes::progress_routes::create_progress_router;
use crate::state::AppState;

/// Router completo del servicio
pub fn create_app(state: AppState) -> Router {
    let cors = cors_for(&state.config);

    Router::new()
        .route("/health", get(health))
        .nest("/api", create_progress_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let routes = state.routes.read().await.len();
    Json(HealthResponse {
        status: "ok",
        routes,
        timestamp: Utc::now(),
    })
}
