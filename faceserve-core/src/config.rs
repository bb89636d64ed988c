//! YAML configuration loading for faceserve

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors produced while loading or validating a configuration file.
///
/// Configuration problems are fatal at startup only; nothing in the runtime
/// indexing path constructs these.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for the expected shape.
    #[error("parsing config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// The config parsed but a value fails semantic validation.
    #[error("invalid config: {0}")]
    Validation(String),
}

/// Top-level configuration: the reserved `global` section plus any number of
/// family-keyed sections.
///
/// ```yaml
/// global:
///   directories:
///     - /srv/fonts
///   port: 3000
/// Acme Sans:
///   obfuscate filenames: false
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global: GlobalConfig,

    /// Family sections. The key is matched as a case-insensitive prefix of a
    /// font's full name.
    #[serde(flatten)]
    pub families: BTreeMap<String, FamilyConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Directories indexed at startup and watched afterwards.
    pub directories: Vec<PathBuf>,

    /// TCP port the HTTP server listens on.
    pub port: u16,

    /// Response-cache lifetime in minutes.
    #[serde(rename = "cache lifetime")]
    pub cache_lifetime: u64,

    pub logs: LogsConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            directories: Vec::new(),
            port: 3000,
            cache_lifetime: 5,
            logs: LogsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    /// Optional file the log is appended to; stderr when unset.
    pub access: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FamilyConfig {
    /// Serve this family under an obfuscated identifier instead of its full
    /// name.
    #[serde(rename = "obfuscate filenames")]
    pub obfuscate_filenames: bool,
}

impl Default for FamilyConfig {
    fn default() -> Self {
        Self {
            obfuscate_filenames: true,
        }
    }
}

impl Config {
    /// Read and parse a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml_ng::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The family section governing `full_name`, if any.
    ///
    /// Keys match as case-insensitive prefixes of the full name; when several
    /// match, the longest (most specific) key wins.
    pub fn font_key_for(&self, full_name: &str) -> Option<(&str, &FamilyConfig)> {
        let lowered = full_name.to_lowercase();
        self.families
            .iter()
            .filter(|(key, _)| lowered.starts_with(&key.to_lowercase()))
            .max_by_key(|(key, _)| key.len())
            .map(|(key, family)| (key.as_str(), family))
    }

    /// Serving requires at least one directory to index.
    pub fn validate_for_serve(&self) -> Result<(), ConfigError> {
        if self.global.directories.is_empty() {
            return Err(ConfigError::Validation(
                "global.directories must list at least one font directory".to_string(),
            ));
        }
        Ok(())
    }
}
