use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;
use tracing::info;

use super::{ApiError, ApiResponse, AppState, HistoryDto, HistoryParams, SearchQuery};
use crate::constants::limits::DEFAULT_HISTORY_LIMIT;
use crate::services::SearchOutcome;

/// `GET /api/search?query=...`
///
/// Cached products when the normalised term has been scraped before,
/// otherwise a fresh scrape whose results are stored in the background.
pub async fn search_products(
    State(state): State<Arc<AppState>>,
    Query(request): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchOutcome>>, ApiError> {
    if request.query.trim().is_empty() {
        return Err(ApiError::validation("Search query cannot be empty"));
    }

    let outcome = state.search_service().search(&request.query).await;

    info!(
        term = %outcome.term,
        source = ?outcome.source,
        products = outcome.total_products,
        "API search completed"
    );

    Ok(Json(ApiResponse::success(outcome)))
}

/// `GET /api/history/{term}`
///
/// The term is matched exactly, so callers pass the normalised form
/// (`red+phone`, not `red phone`).
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(term): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<ApiResponse<HistoryDto>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let entries = state.shared.cache.history(&term, limit).await?;

    if entries.is_empty() {
        return Err(ApiError::not_found("Search term", &term));
    }

    Ok(Json(ApiResponse::success(HistoryDto {
        search_term: term,
        entries,
    })))
}
