use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// OpenWeatherMap API key. Missing is not fatal: dashboards show a
    /// configuration banner and every fetch fails as `NotConfigured`.
    #[serde(default)]
    pub openweathermap_api_key: Option<String>,

    /// Weather provider endpoints
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Weather alert source
    #[serde(default)]
    pub alerts: AlertsConfig,

    /// Dashboard session behaviour
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Base URL of the current weather / 5-day forecast API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL for condition icons
    #[serde(default = "default_icon_base_url")]
    pub icon_base_url: String,

    /// Units: metric, imperial, or standard
    #[serde(default = "default_units")]
    pub units: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            icon_base_url: default_icon_base_url(),
            units: default_units(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertsConfig {
    /// Fetch alerts from the One Call API (requires a One Call subscription)
    #[serde(default)]
    pub enabled: bool,

    /// One Call API 3.0 endpoint
    #[serde(default = "default_onecall_url")]
    pub onecall_url: String,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            onecall_url: default_onecall_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// Fallback latitude used on mount and after a geolocation denial
    #[serde(default = "default_lat")]
    pub default_lat: f64,

    /// Fallback longitude
    #[serde(default = "default_lon")]
    pub default_lon: f64,

    /// Idle sessions are dropped after this many seconds
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_lat: default_lat(),
            default_lon: default_lon(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_icon_base_url() -> String {
    "https://openweathermap.org/img/wn".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_onecall_url() -> String {
    "https://api.openweathermap.org/data/3.0/onecall".to_string()
}

// New York City
fn default_lat() -> f64 {
    40.7128
}

fn default_lon() -> f64 {
    -74.0060
}

fn default_session_ttl_secs() -> u64 {
    60 * 60
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // SKYCAST_OPENWEATHERMAP_API_KEY, SKYCAST_DASHBOARD__DEFAULT_LAT, ...
            .add_source(
                Environment::with_prefix("SKYCAST")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        let mut app: AppConfig = config.try_deserialize()?;

        // An empty env var means "not configured", not an empty key
        if app
            .openweathermap_api_key
            .as_deref()
            .is_some_and(|k| k.trim().is_empty())
        {
            app.openweathermap_api_key = None;
        }

        Ok(app)
    }

    /// User-facing banner text when the provider cannot be used at all
    pub fn configuration_banner(&self) -> Option<String> {
        if self.openweathermap_api_key.is_some() {
            None
        } else {
            Some(
                "Weather provider is not configured. Set SKYCAST_OPENWEATHERMAP_API_KEY \
                 to an OpenWeatherMap API key (https://openweathermap.org/api)."
                    .to_string(),
            )
        }
    }
}
