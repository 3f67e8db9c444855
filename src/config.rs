use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{LatLng, Preferences};
use crate::widgets::SurfaceOptions;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub map: MapSettings,
    #[serde(default)]
    pub defaults: DefaultsSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_data_path")]
    pub data_path: String,
    /// Upper bound for `count` on the search API
    #[serde(default = "default_max_count")]
    pub max_count: u32,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            max_count: default_max_count(),
        }
    }
}

fn default_data_path() -> String { "data".to_string() }
fn default_max_count() -> u32 { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    /// Base URL of the search API, e.g. `http://127.0.0.1:8080/api`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String { "http://127.0.0.1:8080/api".to_string() }
fn default_timeout_secs() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct MapSettings {
    #[serde(default = "default_container")]
    pub container: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: u8,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            container: default_container(),
            style: default_style(),
            access_token: None,
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
        }
    }
}

impl MapSettings {
    pub fn surface_options(&self) -> SurfaceOptions {
        SurfaceOptions {
            container: self.container.clone(),
            style: self.style.clone(),
            access_token: self.access_token.clone(),
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
        }
    }
}

fn default_container() -> String { "map".to_string() }
fn default_style() -> String { "mapbox.streets".to_string() }
fn default_min_zoom() -> u8 { 8 }
fn default_max_zoom() -> u8 { 18 }

/// Preferences the front end starts with
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsSettings {
    #[serde(default = "default_radius_meters")]
    pub radius_meters: u32,
    #[serde(default = "default_result_count")]
    pub result_count: u32,
    #[serde(default = "default_origin_lat")]
    pub origin_lat: f64,
    #[serde(default = "default_origin_lng")]
    pub origin_lng: f64,
}

impl Default for DefaultsSettings {
    fn default() -> Self {
        Self {
            radius_meters: default_radius_meters(),
            result_count: default_result_count(),
            origin_lat: default_origin_lat(),
            origin_lng: default_origin_lng(),
        }
    }
}

fn default_radius_meters() -> u32 { Preferences::DEFAULT_RADIUS_METERS }
fn default_result_count() -> u32 { Preferences::DEFAULT_RESULT_COUNT }
fn default_origin_lat() -> f64 { Preferences::DEFAULT_ORIGIN.lat }
fn default_origin_lng() -> f64 { Preferences::DEFAULT_ORIGIN.lng }

impl From<&DefaultsSettings> for Preferences {
    fn from(defaults: &DefaultsSettings) -> Self {
        Self {
            origin: LatLng::new(defaults.origin_lat, defaults.origin_lng),
            radius_meters: defaults.radius_meters,
            result_count: defaults.result_count,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

/// The part of the configuration the front end needs
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    pub map: MapSettings,
    pub defaults: DefaultsSettings,
    pub search: SearchSettings,
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the structs
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PMAP__)
    /// 5. `DATA_PATH` for the catalog directory
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PMAP__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        apply_data_path(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }

    pub fn client(&self) -> ClientSettings {
        ClientSettings {
            map: self.map.clone(),
            defaults: self.defaults.clone(),
            search: self.search.clone(),
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix("PMAP")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// `DATA_PATH` wins over any configured catalog directory
fn apply_data_path(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATA_PATH") {
        Ok(data_path) => Config::builder()
            .add_source(settings)
            .set_override("catalog.data_path", data_path)?
            .build(),
        Err(_) => Ok(settings),
    }
}
