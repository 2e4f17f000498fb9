use serde::Deserialize;

use crate::observability::{LogConfig, LogFormat};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub pool_size: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default = "default_log_with_target")]
    pub log_with_target: bool,
    #[serde(default)]
    pub log_with_location: bool,
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_with_target() -> bool {
    true
}

fn default_metrics_enabled() -> bool {
    true
}

impl Settings {
    /// Layers `config/default`, an optional `config/local` and `APP__*` environment variables.
    pub fn new() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        builder.build()?.try_deserialize()
    }
}

impl ApplicationSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            format: LogFormat::from(self.log_format.as_str()),
            with_target: self.log_with_target,
            with_location: self.log_with_location,
        }
    }
}
