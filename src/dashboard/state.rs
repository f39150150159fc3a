use serde::Serialize;
use utoipa::ToSchema;

use crate::alerts::WeatherAlert;
use crate::weather::{
    Coordinates, CurrentWeather, ErrorKind, ForecastData, LocationQuery, ProviderError,
};

/// Fetch lifecycle of a dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error,
}

/// What caused a fetch
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// Mount-time load, and the fallback after a geolocation denial
    DefaultLocation(Coordinates),
    Geolocation(Coordinates),
    Search(String),
    MapClick(Coordinates),
}

impl Trigger {
    pub fn location(&self) -> LocationQuery {
        match self {
            Self::DefaultLocation(c) | Self::Geolocation(c) | Self::MapClick(c) => {
                LocationQuery::Coordinates(*c)
            }
            Self::Search(city) => LocationQuery::City(city.clone()),
        }
    }

    /// How the location is named in error messages
    fn subject(&self) -> String {
        match self {
            Self::Search(city) => format!("\"{}\"", city),
            Self::Geolocation(_) => "your current location".to_string(),
            Self::MapClick(_) => "the selected location".to_string(),
            Self::DefaultLocation(_) => "the default location".to_string(),
        }
    }
}

/// Token identifying one triggered fetch; only the latest one may apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Everything one trigger loads, applied together or not at all
#[derive(Debug, Clone)]
pub struct LocationWeather {
    pub current: CurrentWeather,
    pub forecast: ForecastData,
    pub alerts: Vec<WeatherAlert>,
    pub center: Coordinates,
}

pub type FetchOutcome = Result<LocationWeather, ProviderError>;

/// User-facing description of a failed fetch pair
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FetchFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl FetchFailure {
    fn new(trigger: &Trigger, err: &ProviderError) -> Self {
        let subject = trigger.subject();
        let message = match err.kind() {
            ErrorKind::NotFound => match trigger {
                Trigger::Search(_) => format!(
                    "No weather data found for {}. Please check the city name and try again.",
                    subject
                ),
                _ => format!("No weather data is available for {}.", subject),
            },
            ErrorKind::Unauthorized => {
                "The weather provider rejected the API key. Please check your configuration."
                    .to_string()
            }
            ErrorKind::NotConfigured => {
                "The weather provider is not configured. Add an OpenWeatherMap API key."
                    .to_string()
            }
            ErrorKind::Unavailable => format!(
                "Failed to fetch weather data for {}. The weather service is unavailable, please try again later.",
                subject
            ),
        };

        Self {
            kind: err.kind(),
            message,
        }
    }
}

/// In-memory state of one dashboard, changed only through the reducers below
#[derive(Debug, Clone)]
pub struct DashboardState {
    phase: Phase,
    generation: u64,
    in_flight: Option<(Generation, Trigger)>,
    current: Option<CurrentWeather>,
    forecast: Option<ForecastData>,
    alerts: Vec<WeatherAlert>,
    error: Option<FetchFailure>,
    geolocation_warning: Option<String>,
    config_banner: Option<String>,
    map_center: Coordinates,
}

impl DashboardState {
    pub fn new(default_center: Coordinates, config_banner: Option<String>) -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            in_flight: None,
            current: None,
            forecast: None,
            alerts: Vec::new(),
            error: None,
            geolocation_warning: None,
            config_banner,
            map_center: default_center,
        }
    }

    /// Start a fetch. Any earlier fetch still running becomes stale.
    pub fn begin(&mut self, trigger: Trigger) -> Generation {
        self.generation += 1;
        let generation = Generation(self.generation);

        if matches!(trigger, Trigger::Geolocation(_)) {
            self.geolocation_warning = None;
        }

        self.phase = Phase::Loading;
        self.error = None;
        self.in_flight = Some((generation, trigger));
        generation
    }

    pub fn is_latest(&self, generation: Generation) -> bool {
        generation.0 == self.generation
    }

    /// Apply a finished fetch. Returns false when the result was stale and dropped.
    pub fn complete(&mut self, generation: Generation, outcome: FetchOutcome) -> bool {
        if !self.is_latest(generation) {
            tracing::debug!(
                generation = generation.0,
                latest = self.generation,
                "Discarding stale dashboard fetch"
            );
            return false;
        }

        let Some((_, trigger)) = self.in_flight.take() else {
            return false;
        };

        match outcome {
            Ok(loaded) => {
                self.current = Some(loaded.current);
                self.forecast = Some(loaded.forecast);
                self.alerts = loaded.alerts;
                self.map_center = loaded.center;
                self.error = None;
                self.phase = Phase::Ready;
            }
            Err(err) => {
                // Fail together: panels keep whatever they showed before
                self.error = Some(FetchFailure::new(&trigger, &err));
                self.phase = Phase::Error;
            }
        }
        true
    }

    /// Record a geolocation failure. When nothing is shown or loading yet,
    /// the fallback fetch begins in the same step and its generation is returned.
    pub fn geolocation_denied(&mut self, message: String, fallback: Coordinates) -> Option<Generation> {
        self.geolocation_warning = Some(message);
        let idle = self.current.is_none() && self.in_flight.is_none();
        idle.then(|| self.begin(Trigger::DefaultLocation(fallback)))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn current(&self) -> Option<&CurrentWeather> {
        self.current.as_ref()
    }

    pub fn forecast(&self) -> Option<&ForecastData> {
        self.forecast.as_ref()
    }

    pub fn alerts(&self) -> &[WeatherAlert] {
        &self.alerts
    }

    pub fn error(&self) -> Option<&FetchFailure> {
        self.error.as_ref()
    }

    pub fn geolocation_warning(&self) -> Option<&str> {
        self.geolocation_warning.as_deref()
    }

    pub fn config_banner(&self) -> Option<&str> {
        self.config_banner.as_deref()
    }

    pub fn map_center(&self) -> Coordinates {
        self.map_center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::models::{ForecastCity, MainReadings, SunInfo, Wind};
    use crate::weather::Resource;

    const NYC: Coordinates = Coordinates {
        lat: 40.7128,
        lon: -74.006,
    };

    fn loaded(name: &str, center: Coordinates) -> LocationWeather {
        LocationWeather {
            current: CurrentWeather {
                name: name.to_string(),
                coord: center,
                weather: Vec::new(),
                main: MainReadings {
                    temp: 20.0,
                    feels_like: 20.0,
                    temp_min: 18.0,
                    temp_max: 22.0,
                    pressure: 1013,
                    humidity: 50,
                },
                visibility: None,
                wind: Wind::default(),
                sys: SunInfo::default(),
                timezone: 0,
                dt: 0,
            },
            forecast: ForecastData {
                list: Vec::new(),
                city: ForecastCity {
                    name: name.to_string(),
                    coord: center,
                    ..ForecastCity::default()
                },
            },
            alerts: Vec::new(),
            center,
        }
    }

    fn not_found(city: &str) -> ProviderError {
        ProviderError::NotFound {
            resource: Resource::CurrentWeather,
            location: city.to_string(),
        }
    }

    #[test]
    fn test_new_state_is_idle_at_default_center() {
        let state = DashboardState::new(NYC, None);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.map_center(), NYC);
        assert!(state.current().is_none());
    }

    #[test]
    fn test_begin_then_success_is_ready() {
        let mut state = DashboardState::new(NYC, None);
        let g = state.begin(Trigger::DefaultLocation(NYC));
        assert_eq!(state.phase(), Phase::Loading);

        assert!(state.complete(g, Ok(loaded("New York", NYC))));
        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(state.current().map(|c| c.name.as_str()), Some("New York"));
        assert_eq!(state.forecast().map(|f| f.city.name.as_str()), Some("New York"));
    }

    #[test]
    fn test_failure_keeps_previous_panels() {
        let mut state = DashboardState::new(NYC, None);
        let g = state.begin(Trigger::DefaultLocation(NYC));
        state.complete(g, Ok(loaded("New York", NYC)));

        let g = state.begin(Trigger::Search("Atlantis".to_string()));
        assert!(state.complete(g, Err(not_found("Atlantis"))));

        assert_eq!(state.phase(), Phase::Error);
        assert_eq!(state.current().map(|c| c.name.as_str()), Some("New York"));
        assert_eq!(state.map_center(), NYC);
        let error = state.error().expect("error recorded");
        assert_eq!(error.kind, ErrorKind::NotFound);
        assert!(error.message.contains("\"Atlantis\""));
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut state = DashboardState::new(NYC, None);
        let paris = state.begin(Trigger::Search("Paris".to_string()));
        let tokyo = state.begin(Trigger::Search("Tokyo".to_string()));
        assert!(paris < tokyo);

        let tokyo_center = Coordinates {
            lat: 35.6895,
            lon: 139.6917,
        };
        assert!(state.complete(tokyo, Ok(loaded("Tokyo", tokyo_center))));
        assert!(!state.complete(
            paris,
            Ok(loaded("Paris", Coordinates { lat: 48.85, lon: 2.35 }))
        ));

        assert_eq!(state.current().map(|c| c.name.as_str()), Some("Tokyo"));
        assert_eq!(state.map_center(), tokyo_center);
        assert_eq!(state.phase(), Phase::Ready);
    }

    #[test]
    fn test_stale_failure_does_not_clobber_loading() {
        let mut state = DashboardState::new(NYC, None);
        let old = state.begin(Trigger::Search("Paris".to_string()));
        let _new = state.begin(Trigger::Search("Tokyo".to_string()));

        assert!(!state.complete(old, Err(not_found("Paris"))));
        assert_eq!(state.phase(), Phase::Loading);
        assert!(state.error().is_none());
    }

    #[test]
    fn test_begin_clears_previous_error() {
        let mut state = DashboardState::new(NYC, None);
        let g = state.begin(Trigger::Search("Atlantis".to_string()));
        state.complete(g, Err(not_found("Atlantis")));

        state.begin(Trigger::MapClick(NYC));
        assert!(state.error().is_none());
        assert_eq!(state.phase(), Phase::Loading);
    }

    #[test]
    fn test_geolocation_denial_begins_fallback_only_when_empty() {
        let mut state = DashboardState::new(NYC, None);
        let fallback = state
            .geolocation_denied("User denied".to_string(), NYC)
            .expect("fallback begins");
        assert_eq!(state.geolocation_warning(), Some("User denied"));
        assert_eq!(state.phase(), Phase::Loading);
        assert!(state.is_latest(fallback));

        // Fallback already running: no second one
        assert!(state.geolocation_denied("User denied".to_string(), NYC).is_none());
        assert_eq!(state.generation(), fallback.value());
    }

    #[test]
    fn test_geolocation_denial_does_not_supersede_running_search() {
        let mut state = DashboardState::new(NYC, None);
        let paris = state.begin(Trigger::Search("Paris".to_string()));

        assert!(state.geolocation_denied("Timed out".to_string(), NYC).is_none());
        assert!(state.is_latest(paris));

        let center = Coordinates { lat: 48.85, lon: 2.35 };
        assert!(state.complete(paris, Ok(loaded("Paris", center))));
        assert_eq!(state.current().map(|c| c.name.as_str()), Some("Paris"));
        assert_eq!(state.geolocation_warning(), Some("Timed out"));
    }

    #[test]
    fn test_geolocation_grant_clears_warning() {
        let mut state = DashboardState::new(NYC, None);
        let g = state.begin(Trigger::DefaultLocation(NYC));
        state.complete(g, Ok(loaded("New York", NYC)));
        assert!(state.geolocation_denied("Timed out".to_string(), NYC).is_none());
        state.begin(Trigger::Geolocation(NYC));
        assert!(state.geolocation_warning().is_none());
    }

    #[test]
    fn test_error_messages_name_the_location() {
        let unavailable = ProviderError::Unavailable {
            resource: Resource::Forecast,
            cause: "timeout".to_string(),
        };

        let geo = FetchFailure::new(&Trigger::Geolocation(NYC), &unavailable);
        assert_eq!(geo.kind, ErrorKind::Unavailable);
        assert!(geo.message.contains("your current location"));
        assert!(!geo.message.contains("timeout"));

        let search = FetchFailure::new(&Trigger::Search("Oslo".to_string()), &unavailable);
        assert!(search.message.contains("\"Oslo\""));

        let unconfigured = FetchFailure::new(&Trigger::MapClick(NYC), &ProviderError::NotConfigured);
        assert_eq!(unconfigured.kind, ErrorKind::NotConfigured);
    }
}
