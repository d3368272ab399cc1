//! Application-level configuration loading: retry cadence and fallback queue location.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::services::save_coordinator::DEFAULT_RETRY_INTERVAL;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCORECARD_BACK_CONFIG_PATH";
const DEFAULT_QUEUE_DIR: &str = "data/pending";
const DEFAULT_QUEUE_BASE_KEY: &str = "scorecard";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    retry_interval: Duration,
    queue_dir: PathBuf,
    queue_base_key: String,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        Self::load_from(&resolve_config_path())
    }

    /// Load the configuration stored at `path`.
    pub fn load_from(path: &std::path::Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        retry_interval_secs = app_config.retry_interval.as_secs(),
                        queue_dir = %app_config.queue_dir.display(),
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Delay between a failed save and the next retry pass.
    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    /// Directory backing the fallback queue.
    pub fn queue_dir(&self) -> &std::path::Path {
        &self.queue_dir
    }

    /// Key prefix of fallback queue entries.
    pub fn queue_base_key(&self) -> &str {
        &self.queue_base_key
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            retry_interval: DEFAULT_RETRY_INTERVAL,
            queue_dir: PathBuf::from(DEFAULT_QUEUE_DIR),
            queue_base_key: DEFAULT_QUEUE_BASE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    retry_interval_secs: Option<u64>,
    queue_dir: Option<PathBuf>,
    queue_base_key: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        let retry_interval = match value.retry_interval_secs {
            Some(0) => {
                warn!("retry_interval_secs must be positive; using default");
                defaults.retry_interval
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.retry_interval,
        };
        let queue_base_key = value
            .queue_base_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && !key.contains(['/', '\\', '.']))
            .unwrap_or(defaults.queue_base_key);

        Self {
            retry_interval,
            queue_dir: value.queue_dir.unwrap_or(defaults.queue_dir),
            queue_base_key,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.json"));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.retry_interval(), Duration::from_secs(15));
        assert_eq!(config.queue_base_key(), "scorecard");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.json");
        fs::write(
            &path,
            r#"{"retry_interval_secs": 30, "queue_dir": "/tmp/q", "queue_base_key": "card"}"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.retry_interval(), Duration::from_secs(30));
        assert_eq!(config.queue_dir(), std::path::Path::new("/tmp/q"));
        assert_eq!(config.queue_base_key(), "card");
    }

    #[test]
    fn partial_and_invalid_values_fall_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.json");
        fs::write(&path, r#"{"retry_interval_secs": 0, "queue_base_key": "a/b"}"#).unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn malformed_json_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }
}
