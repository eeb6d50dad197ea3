//! Service settings: share-URL prefix, storage location and retry limits

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

pub const SETTINGS_PATH_ENV: &str = "TENNIS_SETTINGS_PATH";

const MIN_TOKEN_LENGTH: usize = 16;
const MAX_TOKEN_LENGTH: usize = 128;
const MAX_SAVE_RETRIES: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSettings {
    /// Prefix of every share URL; matches are shared as `{base_url}/match/{id}`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Root directory of the file store
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Extra attempts after a version conflict before giving up
    #[serde(default = "default_max_save_retries")]
    pub max_save_retries: u32,

    #[serde(default = "default_admin_token_length")]
    pub admin_token_length: usize,
}

fn default_base_url() -> String {
    "http://localhost:3030".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("matches")
}

fn default_max_save_retries() -> u32 {
    3
}

fn default_admin_token_length() -> usize {
    26
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            data_dir: default_data_dir(),
            max_save_retries: default_max_save_retries(),
            admin_token_length: default_admin_token_length(),
        }
    }
}

impl ServiceSettings {
    /// Load settings from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| SettingsError::IoError(e.to_string()))?;
        Self::from_json(&content)
    }

    /// Parse settings from a JSON string; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: ServiceSettings =
            serde_json::from_str(json).map_err(|e| SettingsError::ParseError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Settings from the file named by `TENNIS_SETTINGS_PATH`, or the defaults
    pub fn from_env() -> Result<Self, SettingsError> {
        let Ok(path) = env::var(SETTINGS_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        Self::load(path).map_err(|e| e.with_source(&format!("{SETTINGS_PATH_ENV}='{path}'")))
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(SettingsError::ValidationError(format!(
                "baseUrl must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(SettingsError::ValidationError("dataDir must not be empty".to_string()));
        }
        if !(MIN_TOKEN_LENGTH..=MAX_TOKEN_LENGTH).contains(&self.admin_token_length) {
            return Err(SettingsError::ValidationError(format!(
                "adminTokenLength must be {}-{}, got {}",
                MIN_TOKEN_LENGTH, MAX_TOKEN_LENGTH, self.admin_token_length
            )));
        }
        if self.max_save_retries > MAX_SAVE_RETRIES {
            return Err(SettingsError::ValidationError(format!(
                "maxSaveRetries must be at most {}, got {}",
                MAX_SAVE_RETRIES, self.max_save_retries
            )));
        }
        Ok(())
    }

    /// Public URL spectators use to follow a match
    pub fn share_url(&self, id: &str) -> String {
        format!("{}/match/{}", self.base_url.trim_end_matches('/'), id)
    }
}

/// Errors that can occur when loading/validating ServiceSettings
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    IoError(String),
    ParseError(String),
    ValidationError(String),
}

impl SettingsError {
    fn with_source(self, source: &str) -> Self {
        match self {
            SettingsError::IoError(msg) => SettingsError::IoError(format!("{source}: {msg}")),
            SettingsError::ParseError(msg) => SettingsError::ParseError(format!("{source}: {msg}")),
            SettingsError::ValidationError(msg) => {
                SettingsError::ValidationError(format!("{source}: {msg}"))
            }
        }
    }
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "IO error: {}", msg),
            SettingsError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            SettingsError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}
