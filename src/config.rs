use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub data: DataConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Snapshot files produced by the retrieval job, one JSON array per table
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DataConfig {
    #[validate(length(min = 1))]
    pub prices: String,
    #[validate(length(min = 1))]
    pub loads: String,
    #[validate(length(min = 1))]
    pub production: String,
    #[validate(length(min = 1))]
    pub transfers: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Fixed reference instant; the wall clock is read once when absent
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
    /// Output file; stdout when absent
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_filter(), json: false }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("EMA__").split("__"));
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Self = figment.extract().context("invalid configuration")?;
        cfg.validate().context("configuration failed validation")?;
        Ok(cfg)
    }
}
