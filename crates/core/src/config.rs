use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `ADS_REPORTER__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub meta: MetaConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// Meta Graph API settings. The access token is per-request and never
/// part of the configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaConfig {
    #[serde(default = "default_graph_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_insights_page_limit")]
    pub insights_page_limit: u32,
}

// Default functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8000
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_graph_base_url() -> String {
    "https://graph.facebook.com/v18.0".to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_insights_page_limit() -> u32 {
    500
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            base_url: default_graph_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            insights_page_limit: default_insights_page_limit(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            meta: MetaConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("ADS_REPORTER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
