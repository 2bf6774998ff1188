//! Server Configuration
//!
//! Read from `config.toml` at startup. Every field has a default, so a missing
//! file or a partial file both work.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::DataError;
use crate::job::ReplacePolicy;

/// Environment variable that overrides the config file path
pub const CONFIG_ENV: &str = "JOB_SERVER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Root of the items/ and jobs/ data directories
    pub data_dir: PathBuf,
    /// Game loop period in milliseconds
    pub tick_ms: u64,
    /// What happens when a player with a job is given another one
    pub replace_policy: ReplacePolicy,
    /// Skill keys XP rewards may name
    pub skills: Vec<String>,
    /// Newline separated word list for typing objectives
    pub words_file: Option<PathBuf>,
    /// Job the demo player is given at startup
    pub demo_job: Option<String>,
    /// Stop the demo after this many ticks
    pub demo_ticks: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            tick_ms: 50,
            replace_policy: ReplacePolicy::Replace,
            skills: vec!["driving".to_string(), "mechanic".to_string()],
            words_file: None,
            demo_job: None,
            demo_ticks: 600,
        }
    }
}

impl ServerConfig {
    /// Load from the path in `JOB_SERVER_CONFIG`, or `config.toml`
    pub fn load_default() -> Result<Self, DataError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(Path::new(&path))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        if !path.exists() {
            warn!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| DataError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: ServerConfig = toml::from_str(&content).map_err(|source| DataError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Tick period, never below 1ms
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_ms.max(1))
    }
}
