//! CLI configuration stored in `.c1/config.json`.

use c1_graph::RelationshipGraphSearchOption;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Directory holding the configuration file.
pub const CONFIG_DIR: &str = ".c1";
const CONFIG_FILE: &str = "config.json";
const CONFIG_VERSION: &str = "1.0";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no cache directory available on this platform; pass --cache-dir")]
    NoCacheDir,
}

/// Settings shared by every command. Flags override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: String,
    /// Default search option for `levels`.
    pub search: RelationshipGraphSearchOption,
    /// User reported to the parent cache.
    pub user: Option<String>,
    /// Persistent cache location. Falls back to the platform cache dir.
    pub cache: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            search: RelationshipGraphSearchOption::Native,
            user: None,
            cache: None,
        }
    }
}

impl Config {
    pub fn path(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Reads the config under `root`, or the defaults when there is none.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = Self::path(root);
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json { path, source })
    }

    /// Writes the config under `root`, creating the directory.
    pub fn save(&self, root: &Path) -> Result<PathBuf, ConfigError> {
        let path = Self::path(root);
        let io_err = |source| ConfigError::Io {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(root.join(CONFIG_DIR)).map_err(io_err)?;
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, text).map_err(io_err)?;
        Ok(path)
    }

    /// Where the persistent cache lives: the flag, then the config, then
    /// the platform cache directory.
    pub fn cache_dir(&self, flag: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = flag.or_else(|| self.cache.clone()) {
            return Ok(dir);
        }
        dirs::cache_dir()
            .map(|dir| dir.join("c1").join("parents"))
            .ok_or(ConfigError::NoCacheDir)
    }
}
