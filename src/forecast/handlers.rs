use axum::{extract::State, Json};

use crate::extractors::LocationParam;
use crate::views::ForecastCardView;
use crate::weather::{ForecastData, ProviderError, WeatherProvider};
use crate::AppState;

/// Raw 5-day / 3-hour forecast
///
/// GET /forecast?city=London | /forecast?lat=..&lon=.. | /forecast/{city}
pub async fn get_forecast(
    State(state): State<AppState>,
    location: LocationParam,
) -> Result<Json<ForecastData>, ProviderError> {
    let location = location.or_default(state.default_location());
    let forecast = state.weather_client.forecast(&location).await?;

    tracing::info!(
        city = %forecast.city.name,
        samples = forecast.list.len(),
        "Forecast fetched"
    );

    Ok(Json(forecast))
}

/// Forecast grouped into local days, as shown on the forecast card
///
/// GET /forecast/daily?city=London | /forecast/daily/{city}
pub async fn get_daily_forecast(
    State(state): State<AppState>,
    location: LocationParam,
) -> Result<Json<ForecastCardView>, ProviderError> {
    let location = location.or_default(state.default_location());
    let forecast = state.weather_client.forecast(&location).await?;

    let card = ForecastCardView::new(&forecast, state.weather_client.icon_base_url());
    tracing::debug!(city = %card.location, days = card.days.len(), "Daily forecast built");

    Ok(Json(card))
}
