//! Handlers for the admin link endpoints.
//!
//! An external authentication collaborator gates this surface; handlers
//! assume the caller is already authorized.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::api::dto::link::{
    CreateLinkRequest, LinkResponse, LinkWithStatsResponse, ListLinksResponse, ListQuery,
    SlugCheckResponse, StatsBlock, StatsQuery, StatsResponse, UpdateLinkRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a link.
///
/// # Endpoint
///
/// `POST /api/admin/links`
///
/// Returns 201 with the created record, 400 with field-level errors, or 409
/// when the slug exists.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let now = Utc::now().timestamp();
    let link = state.admin.create(payload.into(), now).await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Lists links, newest first.
///
/// # Endpoint
///
/// `GET /api/admin/links?limit=N`
///
/// `limit` is capped server-side regardless of the requested size.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListLinksResponse>, AppError> {
    let links = state.admin.list(query.limit).await?;
    let total = links.len();

    Ok(Json(ListLinksResponse {
        links: links.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Fetches a link with its placeholder stats block.
///
/// # Endpoint
///
/// `GET /api/admin/links/{slug}`
pub async fn get_link_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkWithStatsResponse>, AppError> {
    let link = state.admin.get(&slug).await?;
    let stats = StatsBlock::placeholder(link.visit_count);

    Ok(Json(LinkWithStatsResponse {
        link: link.into(),
        stats,
    }))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PATCH /api/admin/links/{slug}`
///
/// Unspecified fields are untouched; validation runs against the merged
/// record. The response is not sent until cache invalidation has been issued,
/// so the very next resolution reflects the update.
pub async fn update_link_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    let now = Utc::now().timestamp();
    let link = state.admin.update(&slug, payload.into(), now).await?;

    Ok(Json(link.into()))
}

/// Deletes a link and purges every cache tier.
///
/// # Endpoint
///
/// `DELETE /api/admin/links/{slug}`
pub async fn delete_link_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.admin.delete(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reports whether a slug is free to use.
///
/// # Endpoint
///
/// `GET /api/admin/check-slug/{slug}`
pub async fn check_slug_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SlugCheckResponse>, AppError> {
    let availability = state.admin.check_slug(&slug).await?;
    Ok(Json(availability.into()))
}

/// Returns placeholder statistics for a link.
///
/// # Endpoint
///
/// `GET /api/admin/links/{slug}/stats?period=24h`
pub async fn link_stats_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    let link = state.admin.get(&slug).await?;

    Ok(Json(StatsResponse {
        slug: link.slug,
        period: query.period.unwrap_or_else(|| "24h".to_string()),
        total_visits: link.visit_count,
        by_country: Vec::new(),
        by_referrer: Vec::new(),
    }))
}
