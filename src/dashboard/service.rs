use axum::http::StatusCode;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::state::{DashboardState, FetchOutcome, Generation, LocationWeather, Trigger};
use super::view::{DashboardView, ViewSettings};
use crate::alerts::{AlertSource, WeatherAlert};
use crate::cache::TtlCache;
use crate::error::HttpError;
use crate::geolocation::{GeolocationOutcome, LocationReport};
use crate::impl_into_response;
use crate::views::normalize_query;
use crate::weather::{Coordinates, LocationQuery, ProviderError, Resource, WeatherProvider};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Dashboard session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Search query must not be empty")]
    EmptyQuery,

    #[error("Coordinates out of range: lat={lat}, lon={lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },
}

impl HttpError for DashboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::EmptyQuery | Self::InvalidCoordinates { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::SessionNotFound(_) => Some("SESSION_NOT_FOUND"),
            Self::EmptyQuery => Some("EMPTY_QUERY"),
            Self::InvalidCoordinates { .. } => Some("INVALID_COORDINATES"),
        }
    }
}

impl_into_response!(DashboardError);

pub type Session = Arc<Mutex<DashboardState>>;
pub type SessionStore = Arc<TtlCache<Uuid, Session>>;

/// Drives dashboard sessions: one method per trigger kind
pub struct DashboardService {
    fetcher: Fetcher,
    sessions: SessionStore,
    default_center: Coordinates,
    config_banner: Option<String>,
    view_settings: ViewSettings,
}

impl DashboardService {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        alert_source: Arc<dyn AlertSource>,
        sessions: SessionStore,
        default_center: Coordinates,
        config_banner: Option<String>,
        view_settings: ViewSettings,
    ) -> Self {
        Self {
            fetcher: Fetcher {
                provider,
                alert_source,
            },
            sessions,
            default_center,
            config_banner,
            view_settings,
        }
    }

    /// Open a dashboard and run the mount-time load of the default location
    pub async fn create_session(&self) -> DashboardView {
        let id = Uuid::new_v4();
        let session: Session = Arc::new(Mutex::new(DashboardState::new(
            self.default_center,
            self.config_banner.clone(),
        )));
        self.sessions.insert(id, Arc::clone(&session));

        tracing::info!(session = %id, "Dashboard session created");

        self.run(id, &session, Trigger::DefaultLocation(self.default_center))
            .await
    }

    pub async fn view(&self, id: Uuid) -> Result<DashboardView, DashboardError> {
        let session = self.session(id)?;
        let state = session.lock().await;
        Ok(self.render(id, &state))
    }

    pub async fn search(&self, id: Uuid, query: &str) -> Result<DashboardView, DashboardError> {
        let city = normalize_query(query).ok_or(DashboardError::EmptyQuery)?;
        let session = self.session(id)?;
        Ok(self.run(id, &session, Trigger::Search(city)).await)
    }

    pub async fn map_click(
        &self,
        id: Uuid,
        lat: f64,
        lon: f64,
    ) -> Result<DashboardView, DashboardError> {
        let coords =
            Coordinates::new(lat, lon).ok_or(DashboardError::InvalidCoordinates { lat, lon })?;
        let session = self.session(id)?;
        Ok(self.run(id, &session, Trigger::MapClick(coords)).await)
    }

    pub async fn report_location(
        &self,
        id: Uuid,
        report: LocationReport,
    ) -> Result<DashboardView, DashboardError> {
        let session = self.session(id)?;

        match report.resolve() {
            GeolocationOutcome::Granted(coords) => {
                tracing::debug!(session = %id, lat = %coords.lat, lon = %coords.lon, "Geolocation granted");
                Ok(self.run(id, &session, Trigger::Geolocation(coords)).await)
            }
            GeolocationOutcome::Denied(message) => {
                tracing::warn!(session = %id, reason = %message, "Geolocation unavailable");
                let mut state = session.lock().await;
                match state.geolocation_denied(message, self.default_center) {
                    Some(generation) => {
                        drop(state);
                        let location = LocationQuery::Coordinates(self.default_center);
                        Ok(self.settle(id, &session, generation, location).await)
                    }
                    None => Ok(self.render(id, &state)),
                }
            }
        }
    }

    pub fn close_session(&self, id: Uuid) -> Result<(), DashboardError> {
        self.sessions
            .remove(&id)
            .map(|_| tracing::info!(session = %id, "Dashboard session closed"))
            .ok_or(DashboardError::SessionNotFound(id))
    }

    fn session(&self, id: Uuid) -> Result<Session, DashboardError> {
        self.sessions
            .get(&id)
            .ok_or(DashboardError::SessionNotFound(id))
    }

    fn render(&self, id: Uuid, state: &DashboardState) -> DashboardView {
        DashboardView::render(id, state, &self.view_settings)
    }

    async fn run(&self, id: Uuid, session: &Session, trigger: Trigger) -> DashboardView {
        let location = trigger.location();
        let generation = session.lock().await.begin(trigger);
        self.settle(id, session, generation, location).await
    }

    /// Fetch and apply a begun generation on its own task, then render
    ///
    /// The task outlives the caller, so a dropped request or a request
    /// timeout still takes the session out of `loading`.
    async fn settle(
        &self,
        id: Uuid,
        session: &Session,
        generation: Generation,
        location: LocationQuery,
    ) -> DashboardView {
        tracing::debug!(
            session = %id,
            generation = generation.value(),
            location = %location,
            "Dashboard fetch started"
        );

        let task = tokio::spawn(apply_fetch(
            self.fetcher.clone(),
            Arc::clone(session),
            id,
            generation,
            location,
        ));

        if let Err(e) = task.await {
            tracing::error!(session = %id, generation = generation.value(), error = %e, "Dashboard fetch task failed");
            let failed = Err(ProviderError::Unavailable {
                resource: Resource::CurrentWeather,
                cause: e.to_string(),
            });
            session.lock().await.complete(generation, failed);
        }

        let state = session.lock().await;
        self.render(id, &state)
    }
}

async fn apply_fetch(
    fetcher: Fetcher,
    session: Session,
    id: Uuid,
    generation: Generation,
    location: LocationQuery,
) {
    let outcome = fetcher.fetch_location(&location).await;

    if let Err(e) = &outcome {
        tracing::error!(
            session = %id,
            generation = generation.value(),
            location = %location,
            error = %e,
            "Dashboard fetch failed"
        );
    }

    let mut state = session.lock().await;
    if state.complete(generation, outcome) {
        tracing::info!(
            session = %id,
            generation = generation.value(),
            phase = ?state.phase(),
            "Dashboard updated"
        );
    }
}

/// Provider and alert source shared with fetch tasks
#[derive(Clone)]
struct Fetcher {
    provider: Arc<dyn WeatherProvider>,
    alert_source: Arc<dyn AlertSource>,
}

impl Fetcher {
    /// Current weather and forecast together; either failing fails both
    async fn fetch_location(&self, location: &LocationQuery) -> FetchOutcome {
        let pair = async {
            tokio::try_join!(
                self.provider.current_weather(location),
                self.provider.forecast(location)
            )
        };

        match location {
            LocationQuery::Coordinates(coords) => {
                let (pair, alerts) = tokio::join!(pair, self.alerts_for(*coords));
                let (current, forecast) = pair?;
                Ok(LocationWeather {
                    current,
                    forecast,
                    alerts,
                    center: *coords,
                })
            }
            LocationQuery::City(_) => {
                // Alerts need coordinates, which only the provider knows for a city
                let (current, forecast) = pair.await?;
                let center = current.coord;
                let alerts = self.alerts_for(center).await;
                Ok(LocationWeather {
                    current,
                    forecast,
                    alerts,
                    center,
                })
            }
        }
    }

    /// Alerts never fail the dashboard; a broken alert feed shows as no alerts
    async fn alerts_for(&self, location: Coordinates) -> Vec<WeatherAlert> {
        match self.alert_source.fetch_alerts(location).await {
            Ok(alerts) => alerts,
            Err(e) => {
                tracing::warn!(error = %e, lat = %location.lat, lon = %location.lon, "Failed to fetch weather alerts");
                Vec::new()
            }
        }
    }
}
