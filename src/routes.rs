use axum::{
    routing::{get, post},
    Router,
};

use crate::dashboard::handlers as dashboard_handlers;
use crate::forecast::handlers as forecast_handlers;
use crate::openapi::swagger_ui;
use crate::weather::handlers as weather_handlers;
use crate::AppState;

/// Build the current weather routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/weather", get(weather_handlers::get_weather))
        .route("/weather/{city}", get(weather_handlers::get_weather))
}

/// Build the forecast routes
fn forecast_routes() -> Router<AppState> {
    Router::new()
        .route("/forecast", get(forecast_handlers::get_forecast))
        .route(
            "/forecast/daily",
            get(forecast_handlers::get_daily_forecast),
        )
        .route(
            "/forecast/daily/{city}",
            get(forecast_handlers::get_daily_forecast),
        )
        .route("/forecast/{city}", get(forecast_handlers::get_forecast))
}

/// Build the dashboard session routes
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(dashboard_handlers::create_session))
        .route(
            "/sessions/{id}",
            get(dashboard_handlers::get_session).delete(dashboard_handlers::close_session),
        )
        .route("/sessions/{id}/search", post(dashboard_handlers::search))
        .route(
            "/sessions/{id}/location",
            post(dashboard_handlers::report_location),
        )
        .route("/sessions/{id}/map-click", post(dashboard_handlers::map_click))
}

/// Build all API v1 routes
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(weather_routes())
        .merge(forecast_routes())
        .merge(session_routes())
}

/// Build the complete application router
pub fn build_router() -> Router<AppState> {
    Router::new()
        // Health check at root level
        .route("/", get(weather_handlers::health))
        .route("/health", get(weather_handlers::health))
        .nest("/api/v1", api_v1_routes())
        .merge(swagger_ui())
}
