pub mod handlers;
pub mod models;
pub mod service;

pub use models::{
    Condition, Coordinates, CurrentWeather, ForecastData, ForecastItem, LocationQuery,
};
pub use service::{ErrorKind, ProviderError, Resource, WeatherClient, WeatherProvider};
