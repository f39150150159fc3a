use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

// ============================================================================
// Shared location types
// ============================================================================

/// A point on the map in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Build coordinates, rejecting values outside the WGS84 range
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let coords = Self { lat, lon };
        coords.is_valid().then_some(coords)
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.lat, self.lon)
    }
}

/// What the provider is asked about: a point or a city name
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates(Coordinates),
    City(String),
}

impl LocationQuery {
    /// Query parameters identifying the location
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Coordinates(c) => vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())],
            Self::City(name) => vec![("q", name.clone())],
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinates(c) => write!(f, "{}", c),
            Self::City(name) => f.write_str(name),
        }
    }
}

// ============================================================================
// Current weather (GET /weather)
// ============================================================================

/// Primary condition reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Condition {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: u32,
    pub humidity: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Wind {
    pub speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deg: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SunInfo {
    #[serde(default)]
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Snapshot of current conditions at one location
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentWeather {
    pub name: String,
    pub coord: Coordinates,
    pub weather: Vec<Condition>,
    pub main: MainReadings,
    /// Metres
    #[serde(default)]
    pub visibility: Option<u32>,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub sys: SunInfo,
    /// Seconds east of UTC at the location
    #[serde(default)]
    pub timezone: i32,
    #[serde(default)]
    pub dt: i64,
}

impl CurrentWeather {
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

// ============================================================================
// 5-day / 3-hour forecast (GET /forecast)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ForecastReadings {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    #[serde(default)]
    pub humidity: u32,
}

/// One 3-hour forecast sample
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ForecastItem {
    pub dt: i64,
    pub main: ForecastReadings,
    /// Probability of precipitation, 0..=1
    #[serde(default)]
    pub pop: f64,
    pub weather: Vec<Condition>,
}

impl ForecastItem {
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ForecastCity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub coord: Coordinates,
    /// Seconds east of UTC at the location
    #[serde(default)]
    pub timezone: i32,
}

/// Ordered forecast samples covering roughly five days
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ForecastData {
    pub list: Vec<ForecastItem>,
    #[serde(default)]
    pub city: ForecastCity,
}
