//! Browser geolocation results reported back to the server.
//!
//! The browser runs a single `getCurrentPosition` request and posts the
//! outcome here. There is no retry: a failure is turned into a message for
//! the warning banner and the dashboard keeps its fallback location.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::weather::Coordinates;

/// `GeolocationPositionError.code` values
const PERMISSION_DENIED: u16 = 1;
const POSITION_UNAVAILABLE: u16 = 2;
const TIMEOUT: u16 = 3;

/// What the browser reported
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum LocationReport {
    Position {
        lat: f64,
        lon: f64,
    },
    Failure {
        /// Browser error code; absent when geolocation is unsupported
        #[serde(default)]
        error_code: Option<u16>,
        #[serde(default)]
        message: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeolocationOutcome {
    Granted(Coordinates),
    Denied(String),
}

impl LocationReport {
    pub fn resolve(self) -> GeolocationOutcome {
        match self {
            Self::Position { lat, lon } => match Coordinates::new(lat, lon) {
                Some(coords) => GeolocationOutcome::Granted(coords),
                None => GeolocationOutcome::Denied(format!(
                    "Browser reported invalid coordinates ({}, {}).",
                    lat, lon
                )),
            },
            Self::Failure {
                error_code,
                message,
            } => GeolocationOutcome::Denied(failure_message(error_code, message)),
        }
    }
}

fn failure_message(error_code: Option<u16>, message: Option<String>) -> String {
    match error_code {
        Some(PERMISSION_DENIED) => "User denied the request for Geolocation.".to_string(),
        Some(POSITION_UNAVAILABLE) => "Location information is unavailable.".to_string(),
        Some(TIMEOUT) => "The request to get user location timed out.".to_string(),
        None => "Geolocation is not supported by this browser.".to_string(),
        Some(_) => message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "An unknown error occurred.".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(json: serde_json::Value) -> GeolocationOutcome {
        serde_json::from_value::<LocationReport>(json)
            .expect("report should parse")
            .resolve()
    }

    #[test]
    fn test_position_is_granted() {
        assert_eq!(
            resolve(serde_json::json!({ "lat": 51.5072, "lon": -0.1276 })),
            GeolocationOutcome::Granted(Coordinates {
                lat: 51.5072,
                lon: -0.1276
            })
        );
    }

    #[test]
    fn test_out_of_range_position_is_denied() {
        let outcome = resolve(serde_json::json!({ "lat": 123.0, "lon": 0.0 }));
        assert!(matches!(outcome, GeolocationOutcome::Denied(m) if m.contains("invalid coordinates")));
    }

    #[test]
    fn test_error_codes_map_to_messages() {
        assert_eq!(
            resolve(serde_json::json!({ "error_code": 1 })),
            GeolocationOutcome::Denied("User denied the request for Geolocation.".to_string())
        );
        assert_eq!(
            resolve(serde_json::json!({ "error_code": 2 })),
            GeolocationOutcome::Denied("Location information is unavailable.".to_string())
        );
        assert_eq!(
            resolve(serde_json::json!({ "error_code": 3, "message": "Timeout expired" })),
            GeolocationOutcome::Denied("The request to get user location timed out.".to_string())
        );
    }

    #[test]
    fn test_unsupported_browser() {
        assert_eq!(
            resolve(serde_json::json!({})),
            GeolocationOutcome::Denied("Geolocation is not supported by this browser.".to_string())
        );
    }

    #[test]
    fn test_unknown_code_uses_browser_message() {
        assert_eq!(
            resolve(serde_json::json!({ "error_code": 9, "message": "Sensor offline" })),
            GeolocationOutcome::Denied("Sensor offline".to_string())
        );
        assert_eq!(
            resolve(serde_json::json!({ "error_code": 9 })),
            GeolocationOutcome::Denied("An unknown error occurred.".to_string())
        );
    }
}
