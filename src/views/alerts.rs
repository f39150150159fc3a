use serde::Serialize;
use utoipa::ToSchema;

use super::format_local;
use crate::alerts::{AlertKind, Severity, WeatherAlert};

const NO_ALERTS_MESSAGE: &str = "No active weather alerts for this location.";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AlertItemView {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    /// Icon name for the severity
    pub icon: String,
    /// Accent color for the severity
    pub color: String,
    pub effective: String,
    pub expires: String,
}

/// Alerts panel; `empty_message` is set when there is nothing to show
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AlertsPanelView {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
    pub alerts: Vec<AlertItemView>,
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Extreme => "zap",
        Severity::High => "alert-triangle",
        Severity::Medium => "alert-circle",
        Severity::Low => "info",
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Extreme => "red",
        Severity::High => "orange",
        Severity::Medium => "yellow",
        Severity::Low => "blue",
    }
}

impl AlertsPanelView {
    pub fn new(alerts: &[WeatherAlert], utc_offset_secs: i32) -> Self {
        let items: Vec<AlertItemView> = alerts
            .iter()
            .map(|alert| AlertItemView {
                id: alert.id.clone(),
                kind: alert.kind,
                title: alert.title.clone(),
                description: alert.description.clone(),
                severity: alert.severity,
                icon: severity_icon(alert.severity).to_string(),
                color: severity_color(alert.severity).to_string(),
                effective: format_local(alert.start, utc_offset_secs, "%Y-%m-%d %H:%M"),
                expires: format_local(alert.end, utc_offset_secs, "%Y-%m-%d %H:%M"),
            })
            .collect();

        Self {
            count: items.len(),
            empty_message: items.is_empty().then(|| NO_ALERTS_MESSAGE.to_string()),
            alerts: items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(severity: Severity) -> WeatherAlert {
        WeatherAlert {
            id: "1".to_string(),
            kind: AlertKind::Warning,
            title: "Winter Storm Warning".to_string(),
            description: "Heavy snow expected.".to_string(),
            severity,
            // 2023-11-14 12:00Z .. 2023-11-15 12:00Z
            start: 1_699_963_200,
            end: 1_700_049_600,
            sender: None,
        }
    }

    #[test]
    fn test_empty_panel_has_message() {
        let panel = AlertsPanelView::new(&[], 0);
        assert_eq!(panel.count, 0);
        assert_eq!(panel.empty_message.as_deref(), Some(NO_ALERTS_MESSAGE));
    }

    #[test]
    fn test_severity_drives_icon_and_color() {
        let panel = AlertsPanelView::new(
            &[
                alert(Severity::Extreme),
                alert(Severity::High),
                alert(Severity::Medium),
                alert(Severity::Low),
            ],
            0,
        );

        assert_eq!(panel.count, 4);
        assert!(panel.empty_message.is_none());
        let styles: Vec<_> = panel
            .alerts
            .iter()
            .map(|a| (a.icon.as_str(), a.color.as_str()))
            .collect();
        assert_eq!(
            styles,
            vec![
                ("zap", "red"),
                ("alert-triangle", "orange"),
                ("alert-circle", "yellow"),
                ("info", "blue"),
            ]
        );
    }

    #[test]
    fn test_times_use_location_offset() {
        let panel = AlertsPanelView::new(&[alert(Severity::High)], 3600);
        assert_eq!(panel.alerts[0].effective, "2023-11-14 13:00");
        assert_eq!(panel.alerts[0].expires, "2023-11-15 13:00");
    }
}
