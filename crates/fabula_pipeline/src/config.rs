//! Pipeline configuration.

use config::{Config, File};
use derive_getters::Getters;
use fabula_error::{ConfigError, FabulaResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

fn default_scene_count() -> usize {
    9
}

fn default_item_delay_ms() -> u64 {
    1000
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("assets")
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

/// Tunable knobs for a pipeline run.
///
/// All fields have defaults, so a missing or empty config file yields a
/// working configuration. The scene count is a request forwarded to the
/// model, never enforced against what comes back. A zero item delay
/// disables pacing; tests rely on that.
///
/// # Examples
///
/// ```
/// use fabula_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default().with_item_delay_ms(0);
/// assert_eq!(*config.scene_count(), 9);
/// assert!(config.item_delay().is_zero());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct PipelineConfig {
    /// Number of scene descriptions requested from the model
    #[serde(default = "default_scene_count")]
    scene_count: usize,
    /// Pause between batch items, in milliseconds; zero disables pacing
    #[serde(default = "default_item_delay_ms")]
    item_delay_ms: u64,
    /// Root directory for filesystem asset storage
    #[serde(default = "default_storage_root")]
    storage_root: PathBuf,
    /// Default model identifier passed to drivers that honor it
    #[serde(default = "default_model")]
    model: String,
    /// Sampling temperature for text stages
    #[serde(default = "default_temperature")]
    temperature: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scene_count: default_scene_count(),
            item_delay_ms: default_item_delay_ms(),
            storage_root: default_storage_root(),
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration with precedence: `./fabula.toml` over defaults.
    ///
    /// The file is optional; when absent every field takes its default.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the file exists but cannot be
    /// read or parsed.
    pub fn load() -> FabulaResult<Self> {
        Config::builder()
            .add_source(File::with_name("fabula").required(false))
            .build()
            .map_err(|e| ConfigError::new(format!("failed to build configuration: {e}")))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("failed to parse configuration: {e}")).into())
    }

    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the file cannot be read or
    /// parsed.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> FabulaResult<Self> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "failed to read configuration from {}: {e}",
                    path.as_ref().display()
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("failed to parse configuration: {e}")).into())
    }

    /// The inter-item pause as a `Duration`.
    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }

    /// Replace the requested scene count.
    pub fn with_scene_count(mut self, scene_count: usize) -> Self {
        self.scene_count = scene_count;
        self
    }

    /// Replace the inter-item delay in milliseconds.
    pub fn with_item_delay_ms(mut self, item_delay_ms: u64) -> Self {
        self.item_delay_ms = item_delay_ms;
        self
    }

    /// Replace the storage root.
    pub fn with_storage_root(mut self, storage_root: impl Into<PathBuf>) -> Self {
        self.storage_root = storage_root.into();
        self
    }
}
