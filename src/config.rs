//! Configuration for the posture monitor.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration.
///
/// The window length and evaluation step are counts of samples, not wall-clock
/// durations; the trained model assumes the nominal 50 Hz rate, so changing
/// `sample_period` without retraining shifts what a "window" means physically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Nominal sampling period
    #[serde(with = "duration_millis_serde")]
    pub sample_period: Duration,

    /// Sliding window length in samples
    pub window_len: usize,

    /// Samples between evaluations (window_len / 2 gives 50% overlap)
    pub eval_step: usize,

    /// How long a bad episode must persist before (each) alert
    #[serde(with = "duration_millis_serde")]
    pub alert_threshold: Duration,

    /// Path to the trained model parameters (JSON)
    pub model_path: PathBuf,

    /// Path for session stats and other monitor state
    pub data_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spineguard");

        Self {
            sample_period: Duration::from_millis(20), // 50 Hz
            window_len: 50,                           // 1 s at 50 Hz
            eval_step: 25,                            // 50% overlap
            alert_threshold: Duration::from_millis(3000),
            model_path: data_dir.join("model.json"),
            data_path: data_dir,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spineguard")
            .join("config.json")
    }

    /// Ensure all required directories exist.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Check the pipeline parameters make sense together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_len == 0 {
            return Err(ConfigError::Invalid("window_len must be nonzero".into()));
        }
        if self.eval_step == 0 {
            return Err(ConfigError::Invalid("eval_step must be nonzero".into()));
        }
        if self.eval_step > self.window_len {
            return Err(ConfigError::Invalid(
                "eval_step must not exceed window_len".into(),
            ));
        }
        if self.sample_period.is_zero() {
            return Err(ConfigError::Invalid("sample_period must be nonzero".into()));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
            ConfigError::Invalid(e) => write!(f, "Invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Serde support for millisecond durations.
mod duration_millis_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
