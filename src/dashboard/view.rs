use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::state::{DashboardState, FetchFailure, Phase};
use crate::views::{
    AlertsPanelView, ForecastCardView, MapView, SearchBarView, UnitLabels, WeatherCardView,
};

const WELCOME_MESSAGE: &str =
    "Search for a city or allow location access to get started";

/// The whole dashboard page, ready to render
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardView {
    pub session_id: Uuid,
    pub phase: Phase,
    /// Latest issued fetch generation
    pub generation: u64,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_banner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FetchFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geolocation_warning: Option<String>,
    pub search_bar: SearchBarView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherCardView>,
    pub map: MapView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<ForecastCardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alerts: Option<AlertsPanelView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welcome: Option<String>,
}

/// Presentation settings shared by every session
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub labels: UnitLabels,
    pub icon_base_url: String,
}

impl DashboardView {
    pub fn render(session_id: Uuid, state: &DashboardState, settings: &ViewSettings) -> Self {
        let current = state.current();
        let loading = state.is_loading();

        Self {
            session_id,
            phase: state.phase(),
            generation: state.generation(),
            loading,
            config_banner: state.config_banner().map(str::to_string),
            error: state.error().cloned(),
            geolocation_warning: state.geolocation_warning().map(str::to_string),
            search_bar: SearchBarView::new(loading),
            weather: current
                .map(|w| WeatherCardView::new(w, settings.labels, &settings.icon_base_url)),
            map: MapView::new(state.map_center(), current, settings.labels),
            forecast: state
                .forecast()
                .map(|f| ForecastCardView::new(f, &settings.icon_base_url)),
            // Alerts belong to the loaded location, so they come with it
            alerts: current.map(|w| AlertsPanelView::new(state.alerts(), w.timezone)),
            welcome: (current.is_none() && !loading && state.error().is_none())
                .then(|| WELCOME_MESSAGE.to_string()),
        }
    }
}
