//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use etymtag_lookup::wiktionary::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};
use etymtag_resolver::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default lexicon cache location (relative to the working directory)
pub const DEFAULT_DATABASE: &str = ".cache_origin.sqlite3";

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Lexicon cache database path
    #[serde(default = "default_database")]
    pub database: String,

    /// Lookup source settings
    #[serde(default)]
    pub lookup: LookupSettings,

    /// Resolution settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Remote lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupSettings {
    /// MediaWiki API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// User-Agent sent with lookups
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    #[serde(alias = "jsonl")]
    Json,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".etymtag").join("config.toml"))
    }

    /// Load configuration from `path` (or the default path).
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::path()?,
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&contents)?;
        config.resolver.validate().map_err(CliError::Config)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            lookup: LookupSettings::default(),
            resolver: ResolverConfig::default(),
            settings: Settings::default(),
        }
    }
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Json,
        }
    }
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Json
}

#[cfg(test)]
mod tests {
    use super::*;
    use etymtag_resolver::ThresholdPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database, DEFAULT_DATABASE);
        assert_eq!(config.lookup.endpoint, DEFAULT_ENDPOINT);
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(!config.resolver.offline);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.database, DEFAULT_DATABASE);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
database = "/tmp/lexicon.sqlite3"

[resolver]
offline = true
threshold_policy = "flag"

[settings]
format = "table"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.database, "/tmp/lexicon.sqlite3");
        assert!(config.resolver.offline);
        assert_eq!(config.resolver.threshold_policy, ThresholdPolicy::Flag);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert!(config.settings.color);
        assert_eq!(config.lookup.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_invalid_resolver_section() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[resolver]\nmin_confidence = 3.0\n").unwrap();

        assert!(matches!(Config::load(Some(&path)), Err(CliError::Config(_))));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "database = [").unwrap();

        assert!(matches!(Config::load(Some(&path)), Err(CliError::Toml(_))));
    }
}
