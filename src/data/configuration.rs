//! Service configuration
//!
//! Loaded in layers, lowest precedence first:
//! 1. Defaults (SQLite file in the OS temp dir, port 3000)
//! 2. TOML file, if present
//! 3. `DATABASE_URL` / `PORT` environment variables
//!
//! CLI flags are applied on top by `cli::run`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const PORT_VAR: &str = "PORT";

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
pub struct Configuration {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerSettings,
}

impl Configuration {
    /// Reads `path` if it exists, then applies environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut cfg = if path.exists() {
            let config = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read configuration file: {path:?}"))?;
            Self::from_toml(&config)
                .with_context(|| format!("Failed to parse configuration file: {path:?}"))?
        } else {
            Self::default()
        };
        cfg.apply_overrides(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(content)?;
        Ok(cfg)
    }

    /// Applies `DATABASE_URL` and `PORT` as looked up by `lookup`.
    /// Empty or unparsable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(DATABASE_URL_VAR).filter(|v| !v.is_empty()) {
            self.database.url = url;
        }
        if let Some(port) = lookup(PORT_VAR).and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: default_database_url(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// A throwaway SQLite file, used when no connection string is configured.
fn default_database_url() -> String {
    let path = std::env::temp_dir().join("holonet.db");
    format!("sqlite://{}?mode=rwc", path.display())
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}
