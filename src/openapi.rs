use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::alerts::{AlertKind, Severity, WeatherAlert};
use crate::dashboard::handlers::{MapClickRequest, SearchRequest};
use crate::dashboard::{DashboardView, FetchFailure, Phase};
use crate::error::ErrorResponse;
use crate::geolocation::LocationReport;
use crate::views::{
    AlertItemView, AlertsPanelView, ForecastCardView, ForecastDayView, MapMarker, MapView,
    SearchBarView, WeatherCardView,
};
use crate::weather::models::{
    ForecastCity, ForecastReadings, MainReadings, SunInfo, Wind,
};
use crate::weather::{
    Condition, Coordinates, CurrentWeather, ErrorKind, ForecastData, ForecastItem,
};

/// OpenAPI documentation for the Skycast API
///
/// Schema documentation only; handlers carry no path annotations.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Skycast API",
        version = "0.1.0",
        description = "Weather dashboard backend over OpenWeatherMap. Current conditions, a 5-day forecast, weather alerts and map-based location selection, driven through per-browser dashboard sessions.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    tags(
        (name = "weather", description = "Current weather passthrough"),
        (name = "forecast", description = "5-day forecast, raw and grouped by day"),
        (name = "sessions", description = "Dashboard sessions: search, geolocation and map clicks")
    ),
    components(
        schemas(
            ErrorResponse,
            Coordinates,
            Condition,
            MainReadings,
            Wind,
            SunInfo,
            CurrentWeather,
            ForecastReadings,
            ForecastItem,
            ForecastCity,
            ForecastData,
            ErrorKind,
            AlertKind,
            Severity,
            WeatherAlert,
            LocationReport,
            SearchRequest,
            MapClickRequest,
            Phase,
            FetchFailure,
            WeatherCardView,
            ForecastDayView,
            ForecastCardView,
            AlertItemView,
            AlertsPanelView,
            SearchBarView,
            MapMarker,
            MapView,
            DashboardView,
        )
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
