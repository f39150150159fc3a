use serde::Serialize;
use utoipa::ToSchema;

use super::{round_display, UnitLabels};
use crate::weather::{Coordinates, CurrentWeather};

const DEFAULT_ZOOM: u8 = 6;

/// Marker popup for the loaded location
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MapMarker {
    pub position: Coordinates,
    pub title: String,
    pub temperature: String,
    pub description: String,
    pub feels_like: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MapMarker>,
}

impl MapView {
    pub fn new(center: Coordinates, weather: Option<&CurrentWeather>, labels: UnitLabels) -> Self {
        let marker = weather.map(|w| MapMarker {
            position: w.coord,
            title: w.name.clone(),
            temperature: format!("{}{}", round_display(w.main.temp), labels.temperature),
            description: w
                .condition()
                .map(|c| c.description.clone())
                .unwrap_or_default(),
            feels_like: format!(
                "Feels like {}{}",
                round_display(w.main.feels_like),
                labels.temperature
            ),
        });

        Self {
            center,
            zoom: DEFAULT_ZOOM,
            marker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_without_weather_has_no_marker() {
        let center = Coordinates {
            lat: 40.7128,
            lon: -74.006,
        };
        let map = MapView::new(center, None, UnitLabels::for_units("metric"));
        assert_eq!(map.center, center);
        assert_eq!(map.zoom, 6);
        assert!(map.marker.is_none());
    }
}
