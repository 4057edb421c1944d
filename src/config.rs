//! Persisted user settings stored as TOML in the app directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::app_dirs;
use crate::architecture::Architecture;
use crate::training::{EPOCH_STEP, LearningRate, MAX_EPOCHS, MIN_EPOCHS, TrainingParams};

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Env var consulted for the generation API key unless overridden.
pub const DEFAULT_API_KEY_ENV: &str = "NETLENS_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TIMEOUT_SECS: u64 = 300;

/// Errors that may occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The app directory could not be resolved or created.
    #[error("Config directory unavailable: {0}")]
    Directory(#[from] app_dirs::AppDirError),
    /// Failed to create the parent directory of a config file.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write a config file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to serialize config to TOML.
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

/// Everything persisted between launches.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub training: TrainingSettings,
    pub generation: GenerationSettings,
}

/// Last used training controls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingSettings {
    pub architecture: Architecture,
    pub epoch_count: u32,
    /// Unknown rates load as the default rate.
    #[serde(deserialize_with = "lenient_learning_rate")]
    pub learning_rate: LearningRate,
    /// Fixed RNG seed for reproducible demos.
    pub seed: Option<u64>,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        let params = TrainingParams::default();
        Self {
            architecture: Architecture::default(),
            epoch_count: params.epoch_count(),
            learning_rate: params.learning_rate(),
            seed: None,
        }
    }
}

impl TrainingSettings {
    /// Params built from the stored values, falling back to defaults.
    pub fn params(&self) -> TrainingParams {
        TrainingParams::with_rate(snap_epoch_count(self.epoch_count), self.learning_rate)
            .unwrap_or_default()
    }

    pub fn store_params(&mut self, params: TrainingParams) {
        self.epoch_count = params.epoch_count();
        self.learning_rate = params.learning_rate();
    }
}

/// Where and how to reach the generation service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Endpoint receiving JSON POSTs; generation is unavailable when unset.
    pub endpoint: Option<String>,
    /// Name of the env var holding a bearer token.
    pub api_key_env: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key_env: Some(DEFAULT_API_KEY_ENV.to_string()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GenerationSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.clamp(1, MAX_TIMEOUT_SECS))
    }
}

impl AppSettings {
    /// Clamp stored values into their valid domains.
    pub fn normalized(mut self) -> Self {
        self.training.epoch_count = snap_epoch_count(self.training.epoch_count);
        self.generation.timeout_secs = self.generation.timeout_secs.clamp(1, MAX_TIMEOUT_SECS);
        self.generation.endpoint = self
            .generation
            .endpoint
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        self
    }
}

fn lenient_learning_rate<'de, D>(deserializer: D) -> Result<LearningRate, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(LearningRate::from_value(value).unwrap_or_else(|err| {
        tracing::warn!("{err}; using {}", LearningRate::default());
        LearningRate::default()
    }))
}

/// Clamp to the slider range and round to the nearest slider step.
fn snap_epoch_count(value: u32) -> u32 {
    let clamped = value.clamp(MIN_EPOCHS, MAX_EPOCHS);
    let snapped = (clamped + EPOCH_STEP / 2) / EPOCH_STEP * EPOCH_STEP;
    snapped.clamp(MIN_EPOCHS, MAX_EPOCHS)
}

/// Resolve the configuration file path inside the app directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load settings from `path`, returning defaults if the file does not exist.
pub fn load_from(path: &Path) -> Result<AppSettings, ConfigError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<AppSettings>(&text)
        .map(AppSettings::normalized)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
}

/// Save settings to a specific path, creating parent directories as needed.
pub fn save_to_path(settings: &AppSettings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.training.params(), TrainingParams::default());
    }

    #[test]
    fn saves_and_loads_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut settings = AppSettings::default();
        settings.training.architecture = Architecture::Lstm;
        settings
            .training
            .store_params(TrainingParams::with_rate(70, LearningRate::High).unwrap());
        settings.training.seed = Some(42);
        settings.generation.endpoint = Some("http://localhost:9000/generate".to_string());

        save_to_path(&settings, &path).unwrap();
        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn normalizes_out_of_range_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[training]\nepoch_count = 37\nlearning_rate = 0.001\n\n\
             [generation]\nendpoint = \"  \"\ntimeout_secs = 0\n",
        )
        .unwrap();
        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.training.epoch_count, 40);
        assert_eq!(loaded.training.learning_rate, LearningRate::Low);
        assert_eq!(loaded.generation.endpoint, None);
        assert_eq!(loaded.generation.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn unknown_learning_rate_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[training]\nepoch_count = 60\nlearning_rate = 0.05\n").unwrap();
        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.training.learning_rate, LearningRate::default());
        assert_eq!(loaded.training.epoch_count, 60);
    }

    #[test]
    fn malformed_learning_rate_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[training]\nlearning_rate = \"fast\"\n").unwrap();
        assert!(matches!(
            load_from(&path),
            Err(ConfigError::ParseToml { .. })
        ));
    }

    #[test]
    fn snaps_epoch_counts_to_slider_steps() {
        assert_eq!(snap_epoch_count(0), 10);
        assert_eq!(snap_epoch_count(14), 10);
        assert_eq!(snap_epoch_count(15), 20);
        assert_eq!(snap_epoch_count(250), 100);
    }
}
