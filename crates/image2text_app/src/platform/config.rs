use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::engine_info;
use image2text_core::{ModelName, RetryPolicy};
use image2text_engine::{AtomicFileWriter, CredentialsMode, PersistError, TransportSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "image2text.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
    #[error("failed to write config: {0}")]
    Write(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub credentials: CredentialsMode,
    pub auth_token: Option<String>,
    pub max_attempts: u32,
    pub attempt_timeout_secs: u64,
    pub backoff_step_ms: u64,
    pub connect_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub default_model: String,
    pub log_destination: LogDestination,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let transport = TransportSettings::default();
        let policy = RetryPolicy::default();
        Self {
            base_url: transport.base_url,
            credentials: transport.credentials,
            auth_token: None,
            max_attempts: policy.max_attempts,
            attempt_timeout_secs: policy.attempt_timeout.as_secs(),
            backoff_step_ms: policy.backoff_step.as_millis() as u64,
            connect_timeout_secs: transport.connect_timeout.as_secs(),
            max_response_bytes: transport.max_response_bytes,
            default_model: ModelName::DEFAULT.to_string(),
            log_destination: LogDestination::default(),
        }
    }
}

impl ClientConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            attempt_timeout: Duration::from_secs(self.attempt_timeout_secs),
            backoff_step: Duration::from_millis(self.backoff_step_ms),
        }
    }

    pub fn transport_settings(&self) -> TransportSettings {
        TransportSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            credentials: self.credentials,
            auth_token: self.auth_token.clone(),
            max_response_bytes: self.max_response_bytes,
        }
    }
}

/// Reads the config at `path`. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(ClientConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the default config to `path`, replacing any existing file.
pub fn write_default(path: &Path) -> Result<PathBuf, ConfigError> {
    let content =
        ron::ser::to_string_pretty(&ClientConfig::default(), ron::ser::PrettyConfig::new())?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

    let written = AtomicFileWriter::for_file(path).write(&filename, content.as_bytes())?;
    engine_info!("Wrote default config to {:?}", written);
    Ok(written)
}
