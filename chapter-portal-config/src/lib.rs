use core::fmt::{Debug, Display};
use std::path::PathBuf;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

const CONFIG_FILE: &str = "portal.toml";
const ENV_PREFIX: &str = "PORTAL_";

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Directory holding `users.json`, `admin.json`, `events.json` and the public content fixtures.
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: PathBuf,
    /// Where the session is persisted. Without it the session only lives in memory.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
    /// Students log in by IEEE id alone unless this is set.
    #[serde(default)]
    pub verify_student_password: bool,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fixtures_dir: default_fixtures_dir(),
            storage_path: None,
            verify_student_password: false,
            log_filter: default_log_filter(),
        }
    }
}

fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_log_filter() -> String {
    "info".to_owned()
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] figment::Error),
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[must_use]
pub fn figment() -> Figment {
    Figment::new()
        .merge(Toml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX))
}

pub fn get_config() -> Result<Config, ConfigError> {
    Ok(figment().extract()?)
}
