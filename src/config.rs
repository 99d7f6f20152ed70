//! YAML configuration file
//!
//! ```yaml
//! workbook: data/Laptop_Riwayat.xlsx
//! server:
//!   host: 0.0.0.0
//!   port: 3000
//! credentials:
//!   admin: s3cret
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::auth::StaticCredentials;
use crate::error::{HistoryError, HistoryResult};

/// Workbook read when nothing else is configured
pub const DEFAULT_WORKBOOK: &str = "data/Laptop_Riwayat.xlsx";

fn default_workbook() -> PathBuf {
    PathBuf::from(DEFAULT_WORKBOOK)
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    #[serde(default = "default_workbook")]
    pub workbook: PathBuf,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub credentials: HashMap<String, String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            workbook: default_workbook(),
            server: ServerSection::default(),
            credentials: HashMap::new(),
        }
    }
}

impl DashboardConfig {
    /// Read a config file. Relative workbook paths resolve against the file's directory.
    pub fn load(path: &Path) -> HistoryResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HistoryError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_yaml_str(&content)?;

        if config.workbook.is_relative() {
            if let Some(dir) = path.parent() {
                config.workbook = dir.join(&config.workbook);
            }
        }
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> HistoryResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> HistoryResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Credential table for the auth layer; falls back to the demo accounts
    pub fn credentials(&self) -> StaticCredentials {
        if self.credentials.is_empty() {
            warn!("no credentials configured; using the built-in demo accounts");
            StaticCredentials::demo()
        } else {
            StaticCredentials::new(self.credentials.clone())
        }
    }
}
