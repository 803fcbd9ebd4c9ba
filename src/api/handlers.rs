//! Route handlers

use std::sync::Arc;

use axum::{extract::Query, Extension, Json};
use serde::{Deserialize, Serialize};

use super::error::AppError;
use crate::error::SearchError;
use crate::search::{FacetCounts, RawCriterion, RecipeRecord, RecipeSearchService};

/// POST /api/search-by-details
///
/// A missing or unparsable body is treated like an empty criteria list.
pub async fn search_by_details(
    Extension(service): Extension<Arc<RecipeSearchService>>,
    body: Option<Json<Vec<RawCriterion>>>,
) -> Result<Json<Vec<RecipeRecord>>, AppError> {
    let Some(Json(criteria)) = body else {
        return Err(SearchError::criteria_required().into());
    };

    // Resolution and fuzzy scoring are CPU-bound
    let records = tokio::task::spawn_blocking(move || service.search(&criteria))
        .await
        .map_err(|e| AppError::Internal(format!("Search task failed: {e}")))??;

    Ok(Json(records))
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    #[serde(default)]
    pub query: Option<String>,
}

/// GET /search_by_name?query=<name>
pub async fn search_by_name(
    Extension(service): Extension<Arc<RecipeSearchService>>,
    Query(params): Query<NameQuery>,
) -> Result<Json<Vec<RecipeRecord>>, AppError> {
    let query = params.query.unwrap_or_default();
    Ok(Json(service.search_by_name(&query)?))
}

/// GET /api/unique-values
pub async fn unique_values(
    Extension(service): Extension<Arc<RecipeSearchService>>,
) -> Json<FacetCounts> {
    Json(service.unique_values())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub entities: usize,
    pub recipes: usize,
}

/// GET /health
pub async fn health(
    Extension(service): Extension<Arc<RecipeSearchService>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        entities: service.store().len(),
        recipes: service.recipe_count(),
    })
}
