//! Startup configuration: listen address, persistence directory, and default
//! phase deadlines, loaded from a JSON file with environment overrides. Like
//! `reload_config` in `lobby.rs`, it fails loud on first load rather than
//! falling back to silent defaults for a deployment-critical setting.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("environment variable {0} was set but is not valid: {1}")]
    Env(&'static str, String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Default seconds a movement phase is open for orders before it
    /// auto-processes, absent any admin override.
    #[serde(default = "default_movement_deadline_secs")]
    pub movement_deadline_secs: u64,
    #[serde(default = "default_retreat_deadline_secs")]
    pub retreat_deadline_secs: u64,
    #[serde(default = "default_build_deadline_secs")]
    pub build_deadline_secs: u64,
}

fn default_listen() -> String {
    "127.0.0.1:8432".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_movement_deadline_secs() -> u64 {
    24 * 60 * 60
}

fn default_retreat_deadline_secs() -> u64 {
    12 * 60 * 60
}

fn default_build_deadline_secs() -> u64 {
    12 * 60 * 60
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen: default_listen(),
            data_dir: default_data_dir(),
            movement_deadline_secs: default_movement_deadline_secs(),
            retreat_deadline_secs: default_retreat_deadline_secs(),
            build_deadline_secs: default_build_deadline_secs(),
        }
    }
}

impl ServerConfig {
    /// Load from `path` if it exists, then apply `DIPLOMACY_LISTEN` and
    /// `DIPLOMACY_DATA_DIR` environment overrides on top. Missing config file
    /// is not an error (defaults apply); a present-but-malformed file is.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(body) => serde_json::from_str(&body).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ServerConfig::default(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        if let Ok(listen) = std::env::var("DIPLOMACY_LISTEN") {
            config.listen = listen;
        }
        if let Ok(data_dir) = std::env::var("DIPLOMACY_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = ServerConfig::load(std::path::Path::new("/nonexistent/diplomacy.json")).unwrap();
        assert_eq!(config.listen, default_listen());
    }
}
