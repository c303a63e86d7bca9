//! Configuration loading and root folder resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Tiers 1 and 2 arrive together as [`ConfigOverrides`] (clap reads both).

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the data root folder
pub const ROOT_FOLDER_ENV: &str = "CANDIDATES_ROOT_FOLDER";

/// Config file name looked up inside the root folder
pub const CONFIG_FILE_NAME: &str = "candidates.toml";

/// Database file name used when none is configured
pub const DATABASE_FILE_NAME: &str = "candidates.db";

/// Default upload limit (5 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    /// Bind address
    pub host: String,

    /// HTTP server port
    pub port: u16,

    /// SQLite database file (relative paths resolve against the root folder)
    pub database_path: Option<PathBuf>,

    /// Largest accepted spreadsheet upload in bytes
    pub max_upload_bytes: usize,

    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_path: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Values from the command line or environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub max_upload_bytes: Option<usize>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub max_upload_bytes: usize,
    pub log_level: String,
}

impl ServiceConfig {
    /// Layer overrides over the TOML values
    pub fn resolve(root_folder: PathBuf, toml: TomlConfig, overrides: ConfigOverrides) -> Self {
        let database_path = overrides
            .database_path
            .or(toml.database_path)
            .map(|p| if p.is_relative() { root_folder.join(p) } else { p })
            .unwrap_or_else(|| root_folder.join(DATABASE_FILE_NAME));

        Self {
            host: overrides.host.unwrap_or(toml.host),
            port: overrides.port.unwrap_or(toml.port),
            database_path,
            max_upload_bytes: overrides.max_upload_bytes.unwrap_or(toml.max_upload_bytes),
            log_level: overrides.log_level.unwrap_or(toml.logging.level),
            root_folder,
        }
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Resolve the root folder: CLI argument, then environment, then default
pub fn resolve_root_folder(cli_arg: Option<&Path>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: OS-dependent compiled default
    default_root_folder()
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("candidates"))
        .unwrap_or_else(|| PathBuf::from("./candidates_data"))
}

/// Where the TOML values came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from the config file
    File,
    /// No file at the path; compiled defaults
    Defaults,
}

/// Load the TOML config file
///
/// A missing file is not an error: the defaults are returned with
/// [`ConfigSource::Defaults`] so the caller can warn once logging is up.
/// A file that exists but does not parse is [`Error::Config`].
pub fn load_toml_config(path: &Path) -> Result<(TomlConfig, ConfigSource)> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok((TomlConfig::default(), ConfigSource::Defaults));
        }
        Err(e) => return Err(Error::Io(e)),
    };

    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
    Ok((config, ConfigSource::File))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TomlConfig = toml::from_str("port = 8080\n[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_overrides_win_over_toml() {
        let toml = TomlConfig {
            port: 8080,
            ..Default::default()
        };
        let overrides = ConfigOverrides {
            port: Some(9090),
            log_level: Some("warn".to_string()),
            ..Default::default()
        };
        let config = ServiceConfig::resolve(PathBuf::from("/data"), toml, overrides);
        assert_eq!(config.port, 9090);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn test_database_path_resolution() {
        let root = PathBuf::from("/data");

        let config = ServiceConfig::resolve(root.clone(), TomlConfig::default(), ConfigOverrides::default());
        assert_eq!(config.database_path, PathBuf::from("/data/candidates.db"));

        let toml = TomlConfig {
            database_path: Some(PathBuf::from("db/other.db")),
            ..Default::default()
        };
        let config = ServiceConfig::resolve(root.clone(), toml, ConfigOverrides::default());
        assert_eq!(config.database_path, PathBuf::from("/data/db/other.db"));

        let overrides = ConfigOverrides {
            database_path: Some(PathBuf::from("/tmp/abs.db")),
            ..Default::default()
        };
        let config = ServiceConfig::resolve(root, TomlConfig::default(), overrides);
        assert_eq!(config.database_path, PathBuf::from("/tmp/abs.db"));
    }

    #[test]
    fn test_cli_root_folder_wins() {
        let path = PathBuf::from("/explicit/root");
        assert_eq!(resolve_root_folder(Some(&path)), path);
    }
}
