use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

use super::models::{Coordinates, CurrentWeather, ForecastData, LocationQuery};
use crate::config::ProviderConfig;
use crate::error::HttpError;
use crate::impl_into_response;

/// Which provider resource a request was for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    CurrentWeather,
    Forecast,
}

impl Resource {
    fn endpoint(self) -> &'static str {
        match self {
            Self::CurrentWeather => "weather",
            Self::Forecast => "forecast",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentWeather => f.write_str("current weather"),
            Self::Forecast => f.write_str("forecast"),
        }
    }
}

/// Coarse failure category exposed to the dashboard view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotConfigured,
    NotFound,
    Unauthorized,
    Unavailable,
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Weather provider is not configured (missing API key)")]
    NotConfigured,

    #[error("No {resource} data found for {location}")]
    NotFound { resource: Resource, location: String },

    #[error("Weather provider rejected the API key ({resource})")]
    Unauthorized { resource: Resource },

    #[error("Failed to fetch {resource} data: {cause}")]
    Unavailable { resource: Resource, cause: String },
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConfigured => ErrorKind::NotConfigured,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Unavailable { .. } => ErrorKind::Unavailable,
        }
    }
}

impl HttpError for ProviderError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Unavailable { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::NotConfigured => Some("NOT_CONFIGURED"),
            Self::NotFound { .. } => Some("LOCATION_NOT_FOUND"),
            Self::Unauthorized { .. } => Some("UNAUTHORIZED"),
            Self::Unavailable { .. } => Some("PROVIDER_UNAVAILABLE"),
        }
    }
}

impl_into_response!(ProviderError);

/// Source of current conditions and forecasts
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_weather(
        &self,
        location: &LocationQuery,
    ) -> Result<CurrentWeather, ProviderError>;

    async fn forecast(&self, location: &LocationQuery) -> Result<ForecastData, ProviderError>;
}

/// OpenWeatherMap 2.5 client for current weather and the 5-day forecast
pub struct WeatherClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    icon_base_url: String,
    units: String,
}

impl WeatherClient {
    pub fn new(client: Client, api_key: Option<&str>, config: &ProviderConfig) -> Self {
        Self {
            client,
            api_key: api_key.map(str::to_string),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            icon_base_url: config.icon_base_url.trim_end_matches('/').to_string(),
            units: config.units.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn current_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentWeather, ProviderError> {
        let location = LocationQuery::Coordinates(Coordinates { lat, lon });
        self.fetch(Resource::CurrentWeather, &location).await
    }

    pub async fn current_by_city(&self, name: &str) -> Result<CurrentWeather, ProviderError> {
        let location = LocationQuery::City(name.to_string());
        self.fetch(Resource::CurrentWeather, &location).await
    }

    pub async fn forecast_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<ForecastData, ProviderError> {
        let location = LocationQuery::Coordinates(Coordinates { lat, lon });
        self.fetch(Resource::Forecast, &location).await
    }

    pub async fn forecast_by_city(&self, name: &str) -> Result<ForecastData, ProviderError> {
        let location = LocationQuery::City(name.to_string());
        self.fetch(Resource::Forecast, &location).await
    }

    pub fn icon_base_url(&self) -> &str {
        &self.icon_base_url
    }

    /// Icon image URL for a condition icon code, e.g. "10d"
    pub fn icon_url(&self, code: &str) -> String {
        icon_url(&self.icon_base_url, code)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        resource: Resource,
        location: &LocationQuery,
    ) -> Result<T, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::NotConfigured)?;
        let url = format!("{}/{}", self.base_url, resource.endpoint());

        tracing::debug!(resource = %resource, location = %location, "Fetching from provider");

        let mut params = location.query_params();
        params.push(("appid", api_key.to_string()));
        params.push(("units", self.units.clone()));

        // Query builder handles encoding of spaces and special characters in city names
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                // The URL carries the API key; keep it out of logs and messages
                let e = e.without_url();
                tracing::warn!(resource = %resource, location = %location, error = %e, "Provider request failed");
                ProviderError::Unavailable {
                    resource,
                    cause: e.to_string(),
                }
            })?;

        let status = response.status();
        tracing::debug!(status = %status, resource = %resource, "Received provider response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = %status,
                resource = %resource,
                location = %location,
                body = %body,
                "Provider returned an error"
            );

            return Err(match status {
                reqwest::StatusCode::NOT_FOUND | reqwest::StatusCode::BAD_REQUEST => {
                    ProviderError::NotFound {
                        resource,
                        location: location.to_string(),
                    }
                }
                reqwest::StatusCode::UNAUTHORIZED => ProviderError::Unauthorized { resource },
                _ => ProviderError::Unavailable {
                    resource,
                    cause: format!("HTTP {}", status),
                },
            });
        }

        response.json::<T>().await.map_err(|e| {
            let e = e.without_url();
            tracing::warn!(resource = %resource, error = %e, "Invalid provider response");
            ProviderError::Unavailable {
                resource,
                cause: format!("invalid response: {}", e),
            }
        })
    }
}

#[async_trait]
impl WeatherProvider for WeatherClient {
    async fn current_weather(
        &self,
        location: &LocationQuery,
    ) -> Result<CurrentWeather, ProviderError> {
        match location {
            LocationQuery::Coordinates(c) => self.current_by_coordinates(c.lat, c.lon).await,
            LocationQuery::City(name) => self.current_by_city(name).await,
        }
    }

    async fn forecast(&self, location: &LocationQuery) -> Result<ForecastData, ProviderError> {
        match location {
            LocationQuery::Coordinates(c) => self.forecast_by_coordinates(c.lat, c.lon).await,
            LocationQuery::City(name) => self.forecast_by_city(name).await,
        }
    }
}

/// `{base}/{code}@2x.png`, no validation of the code
pub fn icon_url(base: &str, code: &str) -> String {
    format!("{}/{}@2x.png", base.trim_end_matches('/'), code)
}
