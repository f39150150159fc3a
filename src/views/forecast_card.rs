use serde::Serialize;
use utoipa::ToSchema;

use super::round_display;
use crate::forecast::daily::{group_by_day, DailyForecast};
use crate::weather::service::icon_url;
use crate::weather::ForecastData;

/// One row of the forecast card
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ForecastDayView {
    /// Local calendar date, "YYYY-MM-DD"
    pub date: String,
    /// e.g. "Monday"
    pub weekday: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    pub temp_max: f64,
    pub temp_min: f64,
    /// e.g. "14° / 6°"
    pub temperature_range: String,
    /// Mean probability of precipitation, 0..=1
    pub precipitation_probability: f64,
    /// e.g. "35%"
    pub precipitation: String,
}

impl ForecastDayView {
    fn new(day: &DailyForecast<'_>, icon_base_url: &str) -> Self {
        let condition = day.condition();
        let temp_max = day.max_temp();
        let temp_min = day.min_temp();
        let pop = day.precipitation_probability();

        Self {
            date: day.date.format("%Y-%m-%d").to_string(),
            weekday: day.date.format("%A").to_string(),
            description: condition.map(|c| c.description.clone()).unwrap_or_default(),
            icon_url: condition.map(|c| icon_url(icon_base_url, &c.icon)),
            temp_max,
            temp_min,
            temperature_range: format!(
                "{}° / {}°",
                round_display(temp_max),
                round_display(temp_min)
            ),
            precipitation_probability: pop,
            precipitation: format!("{}%", round_display(pop * 100.0)),
        }
    }
}

/// Multi-day forecast panel
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ForecastCardView {
    pub title: String,
    pub location: String,
    pub days: Vec<ForecastDayView>,
}

impl ForecastCardView {
    pub fn new(forecast: &ForecastData, icon_base_url: &str) -> Self {
        let days: Vec<ForecastDayView> = group_by_day(&forecast.list, forecast.city.timezone)
            .iter()
            .map(|day| ForecastDayView::new(day, icon_base_url))
            .collect();

        Self {
            title: format!("{}-Day Forecast", days.len()),
            location: forecast.city.name.clone(),
            days,
        }
    }
}
