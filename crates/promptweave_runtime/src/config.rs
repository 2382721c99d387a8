//! Runtime configuration.
//!
//! Settings live in TOML and are merged with the `config` crate; see
//! [`RuntimeConfig::load`] for the layering.

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, File, FileFormat};
use promptweave_error::{ConfigError, PromptweaveResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_MODEL: &str = "openai/gpt-4o";
const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_MAX_STEPS: usize = 256;
const DEFAULT_PLACEHOLDER: &str = "[Simulation Mode: LLM response would be generated here]";

/// Engine defaults applied to every run.
///
/// ```toml
/// [runtime]
/// default_model = "anthropic/claude-3-5-sonnet-latest"
/// default_temperature = 0.2
/// max_steps = 64
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// Model identifier for PROMPT steps without a `model` output
    pub default_model: String,
    /// Temperature for PROMPT steps without a `temperature` output
    pub default_temperature: f64,
    /// Maximum number of steps one run may execute
    pub max_steps: usize,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_string(),
            default_temperature: DEFAULT_TEMPERATURE,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// Pacing and placeholder text for simulation mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Delay between replayed tokens when streaming, in milliseconds
    pub token_delay_ms: u64,
    /// Artificial provider latency, in milliseconds
    pub latency_ms: u64,
    /// Generated text when no mocked result is present
    pub placeholder: String,
}

impl SimulationSettings {
    /// Token delay as a duration.
    pub fn token_delay(&self) -> Duration {
        Duration::from_millis(self.token_delay_ms)
    }

    /// Latency as a duration.
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            token_delay_ms: 5,
            latency_ms: 100,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Engine defaults
    pub runtime: RuntimeSettings,
    /// Simulation pacing
    pub simulation: SimulationSettings,
}

impl RuntimeConfig {
    /// Read one TOML file on top of the built-in defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> PromptweaveResult<Self> {
        let path = path.as_ref();
        debug!("Reading runtime settings");
        Self::assemble(
            Config::builder().add_source(File::from(path)),
            &path.display().to_string(),
        )
    }

    /// Layer the bundled `promptweave.toml`, the per-user file and a
    /// `promptweave.toml` in the working directory, later layers winning.
    ///
    /// ```no_run
    /// let config = promptweave_runtime::RuntimeConfig::load()?;
    /// assert!(config.runtime.max_steps > 0);
    /// # Ok::<(), promptweave_error::PromptweaveError>(())
    /// ```
    #[instrument]
    pub fn load() -> PromptweaveResult<Self> {
        const BUNDLED: &str = include_str!("../../../promptweave.toml");

        let user_file =
            dirs::home_dir().map(|home| home.join(".config/promptweave/promptweave.toml"));
        let mut layers = Config::builder().add_source(File::from_str(BUNDLED, FileFormat::Toml));
        if let Some(user_file) = &user_file {
            debug!(user_file = %user_file.display(), "Adding optional user settings");
            layers = layers.add_source(File::from(user_file.as_path()).required(false));
        }
        layers = layers.add_source(File::with_name("promptweave").required(false));

        Self::assemble(layers, "bundled and user settings")
    }

    fn assemble(layers: ConfigBuilder<DefaultState>, origin: &str) -> PromptweaveResult<Self> {
        let merged = layers
            .build()
            .map_err(|e| ConfigError::new(format!("Cannot read {origin}: {e}")))?;
        let config: Self = merged
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Malformed settings in {origin}: {e}")))?;
        config.validate()?;
        debug!(
            default_model = %config.runtime.default_model,
            max_steps = config.runtime.max_steps,
            "Runtime settings ready"
        );
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> PromptweaveResult<()> {
        if self.runtime.max_steps == 0 {
            return Err(ConfigError::new("runtime.max_steps must be at least 1").into());
        }
        if !self.runtime.default_temperature.is_finite() || self.runtime.default_temperature < 0.0
        {
            return Err(ConfigError::new(format!(
                "runtime.default_temperature must be a non-negative number, got {}",
                self.runtime.default_temperature
            ))
            .into());
        }
        if self.runtime.default_model.trim().is_empty() {
            return Err(ConfigError::new("runtime.default_model must not be empty").into());
        }
        Ok(())
    }

    /// Defaults with all simulation delays removed.
    ///
    /// Useful for tests and dry runs where pacing only costs time.
    pub fn without_delays() -> Self {
        let mut config = Self::default();
        config.simulation.token_delay_ms = 0;
        config.simulation.latency_ms = 0;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_defaults_match_builtin_defaults() {
        let bundled: RuntimeConfig = Config::builder()
            .add_source(File::from_str(
                include_str!("../../../promptweave.toml"),
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(bundled, RuntimeConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_step_limit() {
        let mut config = RuntimeConfig::default();
        config.runtime.max_steps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_names_its_path() {
        let err = RuntimeConfig::from_file("/no/such/promptweave.toml").unwrap_err();
        assert!(err.message().starts_with("Cannot read /no/such/promptweave.toml"));
    }

    #[test]
    fn test_wrongly_typed_setting_is_malformed() {
        let layers = Config::builder().add_source(File::from_str(
            "[runtime]\nmax_steps = \"many\"",
            FileFormat::Toml,
        ));
        let err = RuntimeConfig::assemble(layers, "inline settings").unwrap_err();
        assert!(err.message().starts_with("Malformed settings in inline settings"));
    }

    #[test]
    fn test_without_delays() {
        let config = RuntimeConfig::without_delays();
        assert_eq!(config.simulation.token_delay(), Duration::ZERO);
        assert_eq!(config.simulation.latency(), Duration::ZERO);
        assert_eq!(config.runtime.default_model, "openai/gpt-4o");
    }
}
