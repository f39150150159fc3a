//! Presentation models: provider data turned into display-ready values.
//!
//! Nothing here performs I/O. Every view is built from already-fetched
//! data and serialized as part of the dashboard page.

mod alerts;
mod forecast_card;
mod map;
mod search_bar;
mod weather_card;

pub use alerts::{AlertItemView, AlertsPanelView};
pub use forecast_card::{ForecastCardView, ForecastDayView};
pub use map::{MapMarker, MapView};
pub use search_bar::{normalize_query, SearchBarView};
pub use weather_card::WeatherCardView;

use chrono::{DateTime, FixedOffset};

/// Display suffixes for a provider unit system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitLabels {
    pub temperature: &'static str,
    pub speed: &'static str,
}

impl UnitLabels {
    pub fn for_units(units: &str) -> Self {
        match units {
            "imperial" => Self {
                temperature: "°F",
                speed: "mph",
            },
            "standard" => Self {
                temperature: "K",
                speed: "m/s",
            },
            _ => Self {
                temperature: "°C",
                speed: "m/s",
            },
        }
    }
}

/// Round half up, the way browsers round display values
pub(crate) fn round_display(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Format an epoch timestamp at a fixed UTC offset
pub(crate) fn format_local(timestamp: i64, utc_offset_secs: i32, pattern: &str) -> String {
    let offset = FixedOffset::east_opt(utc_offset_secs)
        .or_else(|| FixedOffset::east_opt(0));

    match (DateTime::from_timestamp(timestamp, 0), offset) {
        (Some(dt), Some(offset)) => dt.with_timezone(&offset).format(pattern).to_string(),
        _ => "--".to_string(),
    }
}
