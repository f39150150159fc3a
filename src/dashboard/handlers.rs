use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::service::DashboardError;
use super::view::DashboardView;
use crate::geolocation::LocationReport;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    /// City name as typed; surrounding whitespace is ignored
    pub query: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MapClickRequest {
    pub lat: f64,
    pub lon: f64,
}

/// Open a dashboard and load the default location
///
/// POST /sessions
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<DashboardView>) {
    let view = state.dashboard.create_session().await;
    (StatusCode::CREATED, Json(view))
}

/// GET /sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DashboardView>, DashboardError> {
    Ok(Json(state.dashboard.view(id).await?))
}

/// Search for a city by name
///
/// POST /sessions/{id}/search
pub async fn search(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<DashboardView>, DashboardError> {
    Ok(Json(state.dashboard.search(id, &request.query).await?))
}

/// Report the outcome of a browser geolocation request
///
/// POST /sessions/{id}/location
pub async fn report_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(report): Json<LocationReport>,
) -> Result<Json<DashboardView>, DashboardError> {
    Ok(Json(state.dashboard.report_location(id, report).await?))
}

/// POST /sessions/{id}/map-click
pub async fn map_click(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(click): Json<MapClickRequest>,
) -> Result<Json<DashboardView>, DashboardError> {
    Ok(Json(
        state.dashboard.map_click(id, click.lat, click.lon).await?,
    ))
}

/// DELETE /sessions/{id}
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, DashboardError> {
    state.dashboard.close_session(id)?;
    Ok(StatusCode::NO_CONTENT)
}
