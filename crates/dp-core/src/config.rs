//! Configuration types and parsing for config.yaml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names searched, in order, by [`Config::load_from_dir`].
pub const CONFIG_FILE_NAMES: &[&str] = &["config.yaml", "config.yml"];

/// Main configuration loaded from config.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Target database and the client used to reach it
    pub db: TargetConfig,

    /// Where applied records are kept
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Change file discovery settings
    #[serde(default)]
    pub changes: ChangesConfig,
}

/// Connection parameters of the target database.
///
/// These are handed to the external client on every invocation.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database host
    pub host: String,

    /// Database port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Login user
    pub user: String,

    /// Login password
    #[serde(default, alias = "pwd")]
    pub password: String,

    /// Database (schema) name
    pub name: String,

    /// Database client executable, inserted verbatim at the start of the
    /// client command line (extra client flags may follow the program)
    #[serde(default = "default_client_bin", alias = "mysql_bin")]
    pub client_bin: String,
}

impl std::fmt::Debug for TargetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"****")
            .field("name", &self.name)
            .field("client_bin", &self.client_bin)
            .finish()
    }
}

impl TargetConfig {
    /// `user@host:port/name`, the identity applied records are kept under
    pub fn label(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.name)
    }
}

fn default_port() -> u16 {
    3306
}

fn default_client_bin() -> String {
    "mysql".to_string()
}

/// Location of the applied-records ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Ledger database path (DuckDB file or `:memory:`)
    #[serde(default = "default_ledger_path")]
    pub path: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: default_ledger_path(),
        }
    }
}

fn default_ledger_path() -> String {
    ".dbpatch/ledger.duckdb".to_string()
}

/// Change file discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangesConfig {
    /// Extension (without the dot) that marks a file as a change file
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for ChangesConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
        }
    }
}

fn default_extension() -> String {
    "sql".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, path)
    }

    /// Load configuration from a directory
    /// Looks for config.yaml or config.yml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map(|path| Self::load(&path))
            .unwrap_or_else(|| {
                Err(CoreError::ConfigNotFound {
                    path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                })
            })
    }

    fn parse(content: &str, path: &Path) -> CoreResult<Self> {
        let mut config: Config =
            serde_yaml::from_str(content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    fn normalize(&mut self) {
        let ext = self.changes.extension.trim().trim_start_matches('.');
        self.changes.extension = ext.to_string();
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        let required = [
            ("db.host", &self.db.host),
            ("db.user", &self.db.user),
            ("db.name", &self.db.name),
            ("db.client_bin", &self.db.client_bin),
            ("changes.extension", &self.changes.extension),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("'{key}' cannot be empty"),
                });
            }
        }

        if self.ledger.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "'ledger.path' cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Resolve the ledger path against `root`.
    ///
    /// Returns `None` for an in-memory ledger.
    pub fn ledger_path_absolute(&self, root: &Path) -> Option<PathBuf> {
        if self.ledger.path == ":memory:" {
            return None;
        }
        let path = Path::new(&self.ledger.path);
        if path.is_absolute() {
            Some(path.to_path_buf())
        } else {
            Some(root.join(path))
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
