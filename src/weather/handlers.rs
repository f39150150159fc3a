use axum::{extract::State, Json};
use serde::Serialize;

use super::models::CurrentWeather;
use super::service::{ProviderError, WeatherProvider};
use crate::extractors::LocationParam;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// False when no provider API key is configured
    pub provider_configured: bool,
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        provider_configured: state.weather_client.is_configured(),
    })
}

/// Current weather passthrough
///
/// GET /weather?city=London | /weather?lat=..&lon=.. | /weather/{city}
pub async fn get_weather(
    State(state): State<AppState>,
    location: LocationParam,
) -> Result<Json<CurrentWeather>, ProviderError> {
    let location = location.or_default(state.default_location());
    let weather = state.weather_client.current_weather(&location).await?;

    tracing::info!(city = %weather.name, temp = %weather.main.temp, "Current weather fetched");

    Ok(Json(weather))
}
