mod alerts;
mod cache;
mod config;
mod dashboard;
mod error;
mod extractors;
mod forecast;
mod geolocation;
mod openapi;
mod routes;
mod views;
mod weather;

use axum::{error_handling::HandleErrorLayer, http::StatusCode, BoxError, Router};
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::alerts::{AlertSource, NoAlerts, OneCallAlertSource};
use crate::cache::{start_cleanup_task, TtlCache};
use crate::config::AppConfig;
use crate::dashboard::{DashboardService, SessionStore, ViewSettings};
use crate::views::UnitLabels;
use crate::weather::{Coordinates, WeatherClient, WeatherProvider};

/// Shared HTTP client configuration
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Upper bound for a whole request, including both provider calls
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct AppState {
    pub weather_client: Arc<WeatherClient>,
    pub dashboard: Arc<DashboardService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build every service from configuration around one shared HTTP client
    pub fn new(config: AppConfig, http_client: Client, sessions: SessionStore) -> Self {
        let api_key = config.openweathermap_api_key.as_deref();

        let weather_client = Arc::new(WeatherClient::new(
            http_client.clone(),
            api_key,
            &config.provider,
        ));

        let alert_source: Arc<dyn AlertSource> = if config.alerts.enabled {
            Arc::new(OneCallAlertSource::new(
                http_client,
                api_key,
                &config.alerts.onecall_url,
            ))
        } else {
            Arc::new(NoAlerts)
        };

        let default_center = Coordinates {
            lat: config.dashboard.default_lat,
            lon: config.dashboard.default_lon,
        };

        let provider: Arc<dyn WeatherProvider> = weather_client.clone();
        let dashboard = Arc::new(DashboardService::new(
            provider,
            alert_source,
            sessions,
            default_center,
            config.configuration_banner(),
            ViewSettings {
                labels: UnitLabels::for_units(&config.provider.units),
                icon_base_url: config.provider.icon_base_url.clone(),
            },
        ));

        Self {
            weather_client,
            dashboard,
            config: Arc::new(config),
        }
    }

    /// Location used when a request names none
    pub fn default_location(&self) -> Coordinates {
        Coordinates {
            lat: self.config.dashboard.default_lat,
            lon: self.config.dashboard.default_lon,
        }
    }
}

/// Create shared HTTP client with connection pooling
fn create_http_client(timeout_secs: u64) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .pool_max_idle_per_host(10)
        .build()
}

/// Handle request timeout errors
async fn handle_timeout_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {}", err),
        )
    }
}

/// Full application with middleware applied
fn app(state: AppState) -> Router {
    routes::build_router()
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)),
        )
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skycast=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!("Configuration loaded successfully");

    if let Some(banner) = config.configuration_banner() {
        tracing::warn!("{}", banner);
    }

    let http_client = create_http_client(config.provider.timeout_secs)?;
    tracing::debug!("Shared HTTP client created");

    // Session store, purged of idle dashboards in the background
    let sessions: SessionStore = Arc::new(TtlCache::new(Duration::from_secs(
        config.dashboard.session_ttl_secs,
    )));
    start_cleanup_task(Arc::clone(&sessions), "dashboard_sessions");

    tracing::info!(
        units = %config.provider.units,
        alerts_enabled = config.alerts.enabled,
        default_lat = config.dashboard.default_lat,
        default_lon = config.dashboard.default_lon,
        "Services initialized"
    );

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, http_client, sessions);
    let app = app(state);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
