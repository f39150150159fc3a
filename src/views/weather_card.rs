use serde::Serialize;
use utoipa::ToSchema;

use super::{format_local, round_display, UnitLabels};
use crate::weather::service::icon_url;
use crate::weather::CurrentWeather;

/// Current conditions panel
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeatherCardView {
    pub location: String,
    pub country: String,
    /// e.g. "21°C"
    pub temperature: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    pub feels_like: String,
    /// e.g. "H: 23° L: 17°"
    pub high_low: String,
    pub humidity: String,
    pub wind_speed: String,
    pub pressure: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    /// Local "HH:MM" at the location
    pub sunrise: String,
    pub sunset: String,
}

impl WeatherCardView {
    pub fn new(weather: &CurrentWeather, labels: UnitLabels, icon_base_url: &str) -> Self {
        let condition = weather.condition();
        let main = &weather.main;

        Self {
            location: weather.name.clone(),
            country: weather.sys.country.clone(),
            temperature: format!("{}{}", round_display(main.temp), labels.temperature),
            description: condition.map(|c| c.description.clone()).unwrap_or_default(),
            icon_url: condition.map(|c| icon_url(icon_base_url, &c.icon)),
            feels_like: format!("{}{}", round_display(main.feels_like), labels.temperature),
            high_low: format!(
                "H: {}° L: {}°",
                round_display(main.temp_max),
                round_display(main.temp_min)
            ),
            humidity: format!("{}%", main.humidity),
            wind_speed: format!("{} {}", weather.wind.speed, labels.speed),
            pressure: format!("{} hPa", main.pressure),
            visibility: weather
                .visibility
                .map(|metres| format!("{:.1} km", metres as f64 / 1000.0)),
            sunrise: format_local(weather.sys.sunrise, weather.timezone, "%H:%M"),
            sunset: format_local(weather.sys.sunset, weather.timezone, "%H:%M"),
        }
    }
}
