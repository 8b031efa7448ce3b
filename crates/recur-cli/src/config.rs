use anyhow::{bail, Result};
use chrono::format::{Item, StrftimeItems};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "recur.toml";

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Occurrences listed by `preview` when no limit is given
    #[serde(default = "default_preview_count")]
    pub preview_count: usize,
    /// strftime pattern for printed dates
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Log filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_preview_count() -> usize {
    5
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preview_count: default_preview_count(),
            date_format: default_date_format(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("RECUR_"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            bail!("Invalid date_format '{}'", self.date_format);
        }
        Ok(())
    }
}
