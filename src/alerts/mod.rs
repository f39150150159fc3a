mod onecall;

pub use onecall::OneCallAlertSource;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::weather::Coordinates;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Failed to fetch alerts: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Alert API error: {0}")]
    ApiError(String),

    #[error("Alert source is not configured (missing API key)")]
    NotConfigured,

    #[error("One Call API subscription required for alerts. Subscribe at https://openweathermap.org/api/one-call-3")]
    SubscriptionRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Watch,
    Advisory,
    Emergency,
}

/// Ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Extreme,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WeatherAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    /// Epoch seconds
    pub start: i64,
    pub end: i64,
    /// Issuing agency, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

impl WeatherAlert {
    /// Classify a free-text event name such as "Winter Storm Warning"
    pub fn classify(event: &str) -> (AlertKind, Severity) {
        let event = event.to_lowercase();

        let kind = if event.contains("emergency") {
            AlertKind::Emergency
        } else if event.contains("warning") {
            AlertKind::Warning
        } else if event.contains("watch") {
            AlertKind::Watch
        } else {
            AlertKind::Advisory
        };

        let severity = match kind {
            AlertKind::Emergency => Severity::Extreme,
            _ if event.contains("extreme") => Severity::Extreme,
            AlertKind::Warning => Severity::High,
            AlertKind::Watch => Severity::Medium,
            AlertKind::Advisory => Severity::Low,
        };

        (kind, severity)
    }
}

/// Where the dashboard gets active alerts for a location
#[async_trait]
pub trait AlertSource: Send + Sync {
    async fn fetch_alerts(&self, location: Coordinates) -> Result<Vec<WeatherAlert>, AlertError>;
}

/// Alert source used when alerts are turned off
pub struct NoAlerts;

#[async_trait]
impl AlertSource for NoAlerts {
    async fn fetch_alerts(&self, _location: Coordinates) -> Result<Vec<WeatherAlert>, AlertError> {
        Ok(Vec::new())
    }
}
