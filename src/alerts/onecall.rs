use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{AlertError, AlertSource, WeatherAlert};
use crate::weather::Coordinates;

/// Only the `alerts` block of a One Call 3.0 response
#[derive(Debug, Deserialize)]
struct OneCallAlertsResponse {
    #[serde(default)]
    alerts: Vec<OneCallAlert>,
}

#[derive(Debug, Deserialize)]
struct OneCallAlert {
    #[serde(default)]
    sender_name: String,
    event: String,
    start: i64,
    end: i64,
    #[serde(default)]
    description: String,
}

/// Alerts from the OpenWeatherMap One Call API 3.0
pub struct OneCallAlertSource {
    client: Client,
    api_key: Option<String>,
    url: String,
}

impl OneCallAlertSource {
    pub fn new(client: Client, api_key: Option<&str>, url: &str) -> Self {
        Self {
            client,
            api_key: api_key.map(str::to_string),
            url: url.to_string(),
        }
    }

    fn into_alert(alert: OneCallAlert) -> WeatherAlert {
        let (kind, severity) = WeatherAlert::classify(&alert.event);
        let sender = (!alert.sender_name.is_empty()).then_some(alert.sender_name);

        WeatherAlert {
            id: format!("{}-{}", alert.start, slug(&alert.event)),
            kind,
            title: alert.event,
            description: alert.description.trim().to_string(),
            severity,
            start: alert.start,
            end: alert.end,
            sender,
        }
    }
}

fn slug(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[async_trait]
impl AlertSource for OneCallAlertSource {
    async fn fetch_alerts(&self, location: Coordinates) -> Result<Vec<WeatherAlert>, AlertError> {
        let api_key = self.api_key.as_deref().ok_or(AlertError::NotConfigured)?;

        tracing::debug!(lat = %location.lat, lon = %location.lon, "Fetching weather alerts");

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("lat", location.lat.to_string()),
                ("lon", location.lon.to_string()),
                ("units", "metric".to_string()),
                ("appid", api_key.to_string()),
                ("exclude", "current,minutely,hourly,daily".to_string()),
            ])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AlertError::SubscriptionRequired);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AlertError::ApiError(format!("HTTP {}: {}", status, text)));
        }

        let data: OneCallAlertsResponse = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)?;

        let mut alerts: Vec<WeatherAlert> = data.alerts.into_iter().map(Self::into_alert).collect();
        // Most severe first
        alerts.sort_by(|a, b| b.severity.cmp(&a.severity).then(a.start.cmp(&b.start)));

        tracing::debug!(count = alerts.len(), "Weather alerts fetched");
        Ok(alerts)
    }
}
