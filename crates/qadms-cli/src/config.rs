//! Layered CLI configuration: built-in defaults, then an optional TOML file,
//! then command-line flags (applied by the caller).

use qadms_store::{DEFAULT_INPUT_FORMAT, DEFAULT_SOURCE_TYPE};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "qadms.toml";
pub const DEFAULT_STORE_PATH: &str = ".qadms/token_versions.jsonl";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub store_path: String,
    pub source_type: String,
    pub input_format: String,
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: DEFAULT_STORE_PATH.to_string(),
            source_type: DEFAULT_SOURCE_TYPE.to_string(),
            input_format: DEFAULT_INPUT_FORMAT.to_string(),
            log_filter: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::ParseToml {
            path: path.display().to_string(),
            source,
        })
    }

    /// An explicit path must exist; the default path is optional.
    pub fn load(explicit: Option<&str>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => PathBuf::from(path),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text, &path)
    }
}

pub fn load_or_exit(explicit: Option<&str>) -> Config {
    Config::load(explicit).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(2);
    })
}
