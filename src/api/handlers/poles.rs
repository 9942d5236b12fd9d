//! Bounding-box pole query handler

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use metrics::counter;
use tracing::debug;

use crate::api::dto::{ApiError, ErrorResponse, PageResponse, PoleRecord, PolesQuery};
use crate::config::QueryConfig;
use crate::domain::{DomainError, PoleRepository};

/// Poles endpoint state
#[derive(Clone)]
pub struct PolesAppState {
    pub repository: Arc<dyn PoleRepository>,
    pub query: QueryConfig,
}

/// Query poles inside a bounding box
///
/// Accepts either `bbox=west,south,east,north` or the four discrete
/// bound parameters. The page slice is ordered by id ascending and
/// `total` always reflects the full bounding-box match, so callers can
/// drain all pages deterministically.
#[utoipa::path(
    get,
    path = "/api/poles",
    tag = "Poles",
    params(PolesQuery),
    responses(
        (status = 200, description = "One page of matching poles", body = PageResponse),
        (status = 400, description = "Invalid bounds or area too large", body = ErrorResponse),
        (status = 504, description = "Query timed out", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub async fn list_poles(
    State(state): State<PolesAppState>,
    Query(params): Query<PolesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let result = query_page(&state, &params).await;
    counter!("poles_requests_total", "outcome" => outcome_label(&result)).increment(1);

    let body = result?;
    let cache_control = format!(
        "s-maxage={}, stale-while-revalidate={}",
        state.query.cache_ttl_secs,
        state.query.cache_ttl_secs * 4
    );
    Ok(([(header::CACHE_CONTROL, cache_control)], Json(body)))
}

async fn query_page(
    state: &PolesAppState,
    params: &PolesQuery,
) -> Result<PageResponse, DomainError> {
    // Validation short-circuits before any store access
    let bbox = params.bounding_box()?;
    bbox.check_area(state.query.max_bbox_area)?;
    let page = params.page_request(&state.query.page_limits());

    let total = state.repository.count_in_bounds(&bbox).await?;
    let poles = state.repository.find_page_in_bounds(&bbox, &page).await?;
    debug!(
        "Poles query: {:?} page={} limit={} -> {}/{} records",
        bbox,
        page.page,
        page.limit,
        poles.len(),
        total
    );

    Ok(PageResponse {
        total,
        page: page.page,
        limit: page.limit,
        data: poles.into_iter().map(PoleRecord::from_domain).collect(),
    })
}

fn outcome_label<T>(result: &Result<T, DomainError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(DomainError::InvalidBounds(_)) => "invalid_bounds",
        Err(DomainError::AreaTooLarge { .. }) => "area_too_large",
        Err(DomainError::QueryTimeout) => "timeout",
        Err(DomainError::Database(_)) => "error",
    }
}
