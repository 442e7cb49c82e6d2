//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarEntry, DEFAULT_UPCOMING_DAYS, PlannedContent};
use crate::models::{ContentRequest, ContentResponse};

use super::error::ApiError;
use super::state::AppState;

const DEFAULT_POSTS_PER_WEEK: u32 = 2;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Service health with build metadata.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct PlanCalendarRequest {
    pub niche: String,
    #[serde(default = "default_posts_per_week")]
    pub posts_per_week: u32,
}

fn default_posts_per_week() -> u32 {
    DEFAULT_POSTS_PER_WEEK
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub title: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub title: String,
    pub status: String,
    pub updated: bool,
}

/// POST /api/content/generate
pub async fn generate_content(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContentRequest>,
) -> Result<Json<ContentResponse>, ApiError> {
    state
        .generator
        .generate(&request)
        .await
        .map(Json)
        .map_err(|e| ApiError::generation(&e))
}

/// GET /api/content/health
pub async fn content_health() -> Json<StatusResponse> {
    Json(StatusResponse { status: "healthy" })
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /-/health
pub async fn liveness() -> Json<StatusResponse> {
    Json(StatusResponse { status: "ok" })
}

/// POST /api/calendar/plan
pub async fn plan_calendar(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanCalendarRequest>,
) -> Result<Json<Vec<PlannedContent>>, ApiError> {
    state
        .strategy
        .plan_content_calendar(&request.niche, request.posts_per_week)
        .await
        .map(Json)
        .map_err(|e| ApiError::planning(&e))
}

/// GET /api/calendar/upcoming?days=N
pub async fn upcoming(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UpcomingQuery>,
) -> Json<Vec<CalendarEntry>> {
    let days = query.days.unwrap_or(DEFAULT_UPCOMING_DAYS);
    Json(state.strategy.upcoming(days).await)
}

/// PUT /api/calendar/status
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Json(update): Json<StatusUpdate>,
) -> impl IntoResponse {
    let updated = state
        .strategy
        .update_status(&update.title, &update.status)
        .await;

    let code = if updated {
        StatusCode::OK
    } else {
        tracing::debug!("No calendar entry titled '{}'", update.title);
        StatusCode::NOT_FOUND
    };

    (
        code,
        Json(StatusUpdateResponse {
            title: update.title,
            status: update.status,
            updated,
        }),
    )
}
