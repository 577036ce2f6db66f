use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tower_cookies::Cookies;
use tracing::{debug, info};

use crate::{
    api::models::*,
    auth,
    config::Settings,
    db::{self, DbPool},
    listing::{self, draft::PropertyDraft, ListingQuery, ListingState},
    Result,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub settings: Settings,
}

/// GET /api/properties - Filter, sort and paginate active listings
pub async fn list_properties(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
    Query(limit): Query<LimitParams>,
) -> Result<Json<PropertiesResponse>> {
    debug!("List properties request: {:?} {:?}", query, limit);

    let pagination = &state.settings.pagination;
    let page_size = limit
        .limit
        .unwrap_or(pagination.api_default_limit)
        .min(pagination.api_max_limit);
    let page = query.page().min(pagination.max_pages);

    let records = db::properties::active_records(&state.pool).await?;
    let result = listing::query(&records, &query.params(), query.sort_key(), page, page_size)?;

    Ok(Json(PropertiesResponse {
        pagination: Pagination {
            page: result.page,
            limit: result.page_size,
            total: result.total_matches,
            total_pages: result.total_pages,
        },
        properties: result.items,
    }))
}

/// GET /api/properties/:id - Get property details
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PropertyDetail>> {
    debug!("Get property request: {}", id);

    let property = db::properties::get_active_property(&state.pool, id).await?;
    let reviews = db::reviews::list_reviews_for_property(&state.pool, id).await?;

    Ok(Json(PropertyDetail::new(property, &reviews)))
}

/// GET /api/properties/:id/reviews - Reviews for a property, newest first
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ReviewItem>>> {
    debug!("List reviews request: {}", id);

    db::properties::get_active_property(&state.pool, id).await?;
    let reviews = db::reviews::list_reviews_for_property(&state.pool, id).await?;

    Ok(Json(reviews.into_iter().map(ReviewItem::from).collect()))
}

/// GET /api/stats - Get system statistics
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>> {
    debug!("Get stats request");

    let pool = &state.pool;
    let active = db::properties::active_records(pool).await?;
    let for_rent = active.iter().filter(|r| r.is_rent).count();

    Ok(Json(Stats {
        total_properties: db::properties::count_properties(pool, None).await?,
        active_properties: active.len() as i64,
        pending_properties: db::properties::count_properties(pool, Some(ListingState::Pending))
            .await?,
        expired_properties: db::properties::count_properties(pool, Some(ListingState::Expired))
            .await?,
        for_rent,
        for_sale: active.len() - for_rent,
        total_users: db::users::count_users(pool).await?,
        total_reviews: db::reviews::count_reviews(pool).await?,
    }))
}

/// POST /api/admin/properties - Create a listing from a JSON draft
pub async fn create_property(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(draft): Json<PropertyDraft>,
) -> Result<(StatusCode, Json<PropertyDetail>)> {
    let admin = auth::require_admin(auth::current_user(&state.pool, &cookies).await?)?;

    let new_property = draft.validate()?;
    let property = db::properties::create_property(&state.pool, &new_property).await?;
    info!(
        "Admin {} created property {} via API",
        admin.id, property.id
    );

    Ok((StatusCode::CREATED, Json(PropertyDetail::new(property, &[]))))
}

/// DELETE /api/admin/properties/:id - Delete a listing
pub async fn delete_property(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let admin = auth::require_admin(auth::current_user(&state.pool, &cookies).await?)?;

    db::properties::delete_property(&state.pool, id).await?;
    info!("Admin {} deleted property {} via API", admin.id, id);

    Ok(StatusCode::NO_CONTENT)
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

/// GET /ready - Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<ReadinessResponse>> {
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    Ok(Json(ReadinessResponse {
        ready: db_healthy,
        database: if db_healthy { "ok" } else { "error" }.to_string(),
    }))
}
