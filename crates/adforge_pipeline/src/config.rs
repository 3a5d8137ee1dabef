//! Pipeline configuration.
//!
//! Loaded from TOML with a precedence system: bundled defaults, then
//! `~/.config/adforge/adforge.toml`, then `./adforge.toml`, with user values
//! taking precedence.

use adforge_error::{AdforgeError, AdforgeResult, ConfigError};
use config::{Config, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Knobs for the generation quality loop.
///
/// # Example
///
/// ```
/// use adforge_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(*config.target_satisfaction(), 95);
/// assert_eq!(*config.max_attempts(), 3);
/// ```
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Satisfaction score at which the loop stops improving (0-100)
    #[serde(default = "default_target_satisfaction")]
    #[builder(default = "default_target_satisfaction()")]
    target_satisfaction: u8,

    /// Total generation attempts allowed, the initial one included
    #[serde(default = "default_max_attempts")]
    #[builder(default = "default_max_attempts()")]
    max_attempts: u32,

    /// Hard wall-clock ceiling for one generation job, in milliseconds
    #[serde(default = "default_max_duration_ms")]
    #[builder(default = "default_max_duration_ms()")]
    max_duration_ms: u64,

    /// Repair calls allowed per parse (beyond the initial attempt)
    #[serde(default = "default_repair_ceiling")]
    #[builder(default = "default_repair_ceiling()")]
    repair_ceiling: u32,
}

fn default_target_satisfaction() -> u8 {
    95
}

fn default_max_attempts() -> u32 {
    3
}

fn default_max_duration_ms() -> u64 {
    60_000
}

fn default_repair_ceiling() -> u32 {
    2
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_satisfaction: default_target_satisfaction(),
            max_attempts: default_max_attempts(),
            max_duration_ms: default_max_duration_ms(),
            repair_ceiling: default_repair_ceiling(),
        }
    }
}

/// File shape: the `[pipeline]` section of adforge.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AdforgeConfigFile {
    #[serde(default)]
    pipeline: Option<PipelineConfig>,
}

impl PipelineConfig {
    /// Creates a new config builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validates that all knobs are in usable ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if the target exceeds 100, or any budget is zero.
    pub fn validate(&self) -> AdforgeResult<()> {
        if self.target_satisfaction > 100 {
            return Err(ConfigError::new(format!(
                "target_satisfaction must be in [0, 100], got {}",
                self.target_satisfaction
            ))
            .into());
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::new("max_attempts must be at least 1").into());
        }
        if self.max_duration_ms == 0 {
            return Err(ConfigError::new("max_duration_ms must be positive").into());
        }
        Ok(())
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override
    /// earlier):
    /// 1. Bundled defaults (adforge.toml shipped with the workspace)
    /// 2. User config in home directory (~/.config/adforge/adforge.toml)
    /// 3. User config in current directory (./adforge.toml)
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> AdforgeResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        // Bundled default configuration
        const DEFAULT_CONFIG: &str = include_str!("../../../adforge.toml");

        let mut builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/adforge/adforge.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("adforge").required(false));

        let file: AdforgeConfigFile = builder
            .build()
            .map_err(|e| {
                AdforgeError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                AdforgeError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        let config = file.pipeline.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_knobs_are_in_range() {
        let config = PipelineConfig::default();
        assert_eq!(*config.target_satisfaction(), 95);
        assert_eq!(*config.max_attempts(), 3);
        assert_eq!(*config.max_duration_ms(), 60_000);
        assert_eq!(*config.repair_ceiling(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_attempts_fails_validation() {
        let config = PipelineConfig::builder()
            .max_attempts(0u32)
            .build()
            .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn bundled_defaults_parse() {
        let file: AdforgeConfigFile =
            toml::from_str(include_str!("../../../adforge.toml")).unwrap();
        let pipeline = file.pipeline.unwrap();
        assert!(pipeline.validate().is_ok());
    }
}
