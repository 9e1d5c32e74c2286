use serde::{Deserialize, Serialize};

use crate::common::DEFAULT_PAGE_SIZE;

/// Feature flags controlling which optional behaviour is active.
///
/// Every flag defaults to `false` except `demo_data`, so a missing or
/// incomplete config file still gives a usable local portal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureFlags {
    /// Export spans and logs over OTLP.
    #[serde(default)]
    pub telemetry: bool,
    /// Seed the record table with sample FIRs at startup.
    #[serde(default = "default_true")]
    pub demo_data: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            telemetry: false,
            demo_data: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Officer roster offered for assignment.
    #[serde(default = "default_officers")]
    pub officers: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            page_size: default_page_size(),
            officers: default_officers(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSettings {
    #[serde(default = "default_token_expiry")]
    pub token_expiry_minutes: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_expiry_minutes: default_token_expiry(),
        }
    }
}

/// Client-side settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortalSettings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Artificial commit latency of the local backend.
    #[serde(default = "default_submit_delay")]
    pub submit_delay_ms: u64,
    #[serde(default = "default_mapbox_base_url")]
    pub mapbox_base_url: String,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            submit_delay_ms: default_submit_delay(),
            mapbox_base_url: default_mapbox_base_url(),
        }
    }
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub portal: PortalSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            features: FeatureFlags::default(),
            server: ServerSettings::default(),
            auth: AuthSettings::default(),
            portal: PortalSettings::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_officers() -> Vec<String> {
    ["Officer Smith", "Officer Johnson", "Officer Garcia", "Officer Chen", "Officer Rodriguez"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_token_expiry() -> i64 {
    60
}

fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_submit_delay() -> u64 {
    2000
}

fn default_mapbox_base_url() -> String {
    "https://api.mapbox.com".to_string()
}
