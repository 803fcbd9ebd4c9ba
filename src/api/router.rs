//! Router construction for the recipe finder server.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use crate::search::RecipeSearchService;

/// Build the full axum router with all routes and middleware.
pub fn build_router(service: Arc<RecipeSearchService>) -> Router {
    Router::new()
        .route("/api/search-by-details", post(handlers::search_by_details))
        .route("/api/unique-values", get(handlers::unique_values))
        .route("/search_by_name", get(handlers::search_by_name))
        .route("/health", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(Extension(service)),
        )
}
