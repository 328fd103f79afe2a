//! Server configuration.
//!
//! Values come from an optional `teamroster.toml` (or the file named by
//! `TEAMROSTER_CONFIG`), then environment variables override individual
//! fields.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Canonical config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "teamroster.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the SQLite database.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_db_file")]
    pub db_file: String,
    /// Served under `/static` when the directory exists.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
            db_file: default_db_file(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_db_file() -> String {
    "teams.db".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl ServerConfig {
    /// Full path of the SQLite database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parsing server config")
    }

    /// Apply environment overrides. `lookup` is `std::env::var` in production.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |key: &str| lookup(key).filter(|s| !s.is_empty());

        if let Some(host) = var("HOST") {
            self.host = host;
        }
        if let Some(port) = var("PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("PORT must be a port number, got {port:?}"))?;
        }
        if let Some(dir) = var("TEAMROSTER_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(file) = var("TEAMROSTER_DB_FILE") {
            self.db_file = file;
        }
        if let Some(dir) = var("TEAMROSTER_STATIC_DIR") {
            self.static_dir = PathBuf::from(dir);
        }
        Ok(())
    }
}

/// Load the config file (if any) and apply environment overrides.
pub fn load() -> Result<ServerConfig> {
    let explicit = std::env::var("TEAMROSTER_CONFIG")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);

    let mut config = match explicit {
        Some(path) => read_file(&path)?,
        None if Path::new(CONFIG_FILE_NAME).exists() => read_file(Path::new(CONFIG_FILE_NAME))?,
        None => ServerConfig::default(),
    };
    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<ServerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    tracing::info!("config loaded from {}", path.display());
    ServerConfig::from_toml(&text)
}
