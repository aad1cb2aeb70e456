use std::env;

use crate::status::Thresholds;

#[derive(Debug, Clone)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Document store
    pub store_base_url: String,
    pub store_bearer_token: Option<String>,
    pub store_timeout_seconds: u64,
    pub store_page_limit: usize,
    pub store_max_docs: usize,

    // Refresh settings
    pub refresh_interval_seconds: u64,
    /// Device ids used when listing from the store fails.
    pub fallback_device_ids: Vec<String>,

    // Chart settings
    pub max_plot_points: usize,
    pub window_lag_buckets: i64,
    pub max_lookback_days: i64,

    // Status classification
    pub thresholds: Thresholds,

    // API settings
    pub api_host: String,
    pub api_port: u16,

    // Rate limiting
    pub disable_rate_limiting: bool,
    pub rate_limit_metadata_per_second: u64,
    pub rate_limit_metadata_burst: u32,
    pub rate_limit_data_per_second: u64,
    pub rate_limit_data_burst: u32,
    pub bulk_concurrent_limit: usize,

    // Caching
    pub cache_ttl_seconds: u64,
    pub cache_max_bytes: u64,

    // Application metadata
    pub deployment: Deployment,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if required environment variables are not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            // Document store
            store_base_url: env::var("STORE_BASE_URL")
                .map_err(|_| ConfigError::Missing("STORE_BASE_URL"))?,
            store_bearer_token: env::var("STORE_BEARER_TOKEN").ok(),
            store_timeout_seconds: env_or("STORE_TIMEOUT_SECONDS", 30),
            store_page_limit: env_or("STORE_PAGE_LIMIT", 200),
            store_max_docs: env_or("STORE_MAX_DOCS", 1400),

            // Refresh settings
            refresh_interval_seconds: env_or("REFRESH_INTERVAL_SECONDS", 60),
            fallback_device_ids: env::var("FALLBACK_DEVICE_IDS")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),

            // Chart settings
            max_plot_points: env_or("MAX_PLOT_POINTS", 360),
            window_lag_buckets: env_or("WINDOW_LAG_BUCKETS", 1),
            max_lookback_days: env_or("MAX_LOOKBACK_DAYS", 90),

            // Status classification
            thresholds: Thresholds {
                salinity_low: env_or("SALINITY_LOW", 8.0),
                salinity_high: env_or("SALINITY_HIGH", 12.0),
                ph_low: env_or("PH_LOW", 6.5),
                ph_high: env_or("PH_HIGH", 8.5),
                temperature_low: env_or("TEMPERATURE_LOW", 25.0),
                temperature_high: env_or("TEMPERATURE_HIGH", 32.0),
                battery_low_pct: env_or("BATTERY_LOW_PCT", 20.0),
                battery_low_inclusive: env_or("BATTERY_LOW_INCLUSIVE", true),
                offline_after_secs: env_or::<i64>("OFFLINE_MINUTES", 10) * 60,
            },

            // API settings
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env_or("API_PORT", 3000),

            // Rate limiting
            disable_rate_limiting: env_or("DISABLE_RATE_LIMITING", false),
            rate_limit_metadata_per_second: env_or("RATE_LIMIT_METADATA_PER_SECOND", 1),
            rate_limit_metadata_burst: env_or("RATE_LIMIT_METADATA_BURST", 60),
            rate_limit_data_per_second: env_or("RATE_LIMIT_DATA_PER_SECOND", 10),
            rate_limit_data_burst: env_or("RATE_LIMIT_DATA_BURST", 60),
            bulk_concurrent_limit: env_or("BULK_CONCURRENT_LIMIT", 5),

            // Caching
            cache_ttl_seconds: env_or("CACHE_TTL_SECONDS", 60),
            cache_max_bytes: env_or("CACHE_MAX_BYTES", 209_715_200), // 200MB default

            // Application metadata
            deployment: Deployment::from_str(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
        })
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
