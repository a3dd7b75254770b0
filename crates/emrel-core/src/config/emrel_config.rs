//! Top-level emrel configuration with 4-layer resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AreaMode, EngineConfig, EngineKind, ModelConfig, SimulationConfig};
use crate::errors::ConfigError;

/// Project-level config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "emrel.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`EMREL_*`)
/// 3. Project config (`emrel.toml` in the project root, or an explicit file)
/// 4. User config (`~/.emrel/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct EmrelConfig {
    pub model: ModelConfig,
    pub simulation: SimulationConfig,
    pub engine: EngineConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub time_step_ms: Option<u64>,
    pub r_limit: Option<f64>,
    pub max_iterations: Option<u64>,
    pub max_elapsed_ms: Option<u64>,
    pub area_mode: Option<AreaMode>,
    pub engine_kind: Option<EngineKind>,
    pub engine_program: Option<String>,
    pub engine_args: Vec<String>,
    pub engine_timeout_secs: Option<u64>,
}

impl EmrelConfig {
    /// Load configuration with 4-layer resolution.
    ///
    /// `explicit` replaces the project layer (`emrel.toml` in `root`) and must exist.
    pub fn load(
        root: &Path,
        explicit: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(
                            path = %user_config_path.display(),
                            error = %e,
                            "ignoring unreadable user config"
                        );
                    }
                }
            }
        }

        // Layer 3: project config
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::merge_toml_file(&mut config, path)?;
            }
            None => {
                let project_config_path = root.join(PROJECT_CONFIG_FILE);
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &EmrelConfig) -> Result<(), ConfigError> {
        if let Some(r_limit) = config.simulation.r_limit {
            if !(r_limit > 0.0 && r_limit < 1.0) {
                return Err(invalid("simulation.r_limit", "must be strictly between 0.0 and 1.0"));
            }
        }
        if config.simulation.time_step_ms == Some(0) {
            return Err(invalid("simulation.time_step_ms", "must be greater than 0"));
        }
        if config.simulation.max_iterations == Some(0) {
            return Err(invalid("simulation.max_iterations", "must be greater than 0"));
        }
        if config.simulation.max_elapsed_ms == Some(0) {
            return Err(invalid("simulation.max_elapsed_ms", "must be greater than 0"));
        }
        if config.engine.timeout_secs == Some(0) {
            return Err(invalid("engine.timeout_secs", "must be greater than 0"));
        }
        if let Some(ref program) = config.engine.program {
            if program.trim().is_empty() {
                return Err(invalid("engine.program", "must not be empty"));
            }
        }

        let model = &config.model;
        for (field, value) in [
            ("model.activation_energy", model.activation_energy),
            ("model.boltzmann_constant", model.boltzmann_constant),
            ("model.current_density", model.current_density),
            ("model.cross_section_constant", model.cross_section_constant),
            ("model.weibull_shape", model.weibull_shape),
            ("model.gamma_correction", model.gamma_correction),
        ] {
            if let Some(v) = value {
                if !(v.is_finite() && v > 0.0) {
                    return Err(invalid(field, "must be a positive finite number"));
                }
            }
        }
        if let Some(n) = model.current_density_exponent {
            if !n.is_finite() {
                return Err(invalid("model.current_density_exponent", "must be finite"));
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.emrel/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".emrel").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut EmrelConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: EmrelConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(path = %path.display(), "merged config file");
        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a `Some` value.
    fn merge(base: &mut EmrelConfig, other: &EmrelConfig) {
        // Model
        let (b, o) = (&mut base.model, &other.model);
        merge_opt(&mut b.activation_energy, o.activation_energy);
        merge_opt(&mut b.boltzmann_constant, o.boltzmann_constant);
        merge_opt(&mut b.current_density, o.current_density);
        merge_opt(&mut b.current_density_exponent, o.current_density_exponent);
        merge_opt(&mut b.cross_section_constant, o.cross_section_constant);
        merge_opt(&mut b.weibull_shape, o.weibull_shape);
        merge_opt(&mut b.gamma_correction, o.gamma_correction);

        // Simulation
        let (b, o) = (&mut base.simulation, &other.simulation);
        merge_opt(&mut b.time_step_ms, o.time_step_ms);
        merge_opt(&mut b.r_limit, o.r_limit);
        merge_opt(&mut b.max_iterations, o.max_iterations);
        merge_opt(&mut b.max_elapsed_ms, o.max_elapsed_ms);
        merge_opt(&mut b.area_mode, o.area_mode);

        // Engine
        let (b, o) = (&mut base.engine, &other.engine);
        merge_opt(&mut b.kind, o.kind);
        if o.program.is_some() {
            b.program = o.program.clone();
        }
        if !o.args.is_empty() {
            b.args = o.args.clone();
        }
        merge_opt(&mut b.timeout_secs, o.timeout_secs);
    }

    /// Apply environment variable overrides.
    /// Pattern: `EMREL_TIME_STEP_MS`, `EMREL_R_LIMIT`, `EMREL_ENGINE`, etc.
    /// Values that fail to parse are ignored.
    fn apply_env_overrides(config: &mut EmrelConfig) {
        env_parse("EMREL_TIME_STEP_MS", &mut config.simulation.time_step_ms);
        env_parse("EMREL_R_LIMIT", &mut config.simulation.r_limit);
        env_parse("EMREL_MAX_ITERATIONS", &mut config.simulation.max_iterations);
        env_parse("EMREL_MAX_ELAPSED_MS", &mut config.simulation.max_elapsed_ms);
        env_parse("EMREL_AREA_MODE", &mut config.simulation.area_mode);
        env_parse("EMREL_ENGINE", &mut config.engine.kind);
        env_parse("EMREL_ENGINE_TIMEOUT_SECS", &mut config.engine.timeout_secs);
        env_parse("EMREL_ACTIVATION_ENERGY", &mut config.model.activation_energy);
        if let Ok(val) = std::env::var("EMREL_ENGINE_PROGRAM") {
            config.engine.program = Some(val);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut EmrelConfig, cli: &CliOverrides) {
        merge_opt(&mut config.simulation.time_step_ms, cli.time_step_ms);
        merge_opt(&mut config.simulation.r_limit, cli.r_limit);
        merge_opt(&mut config.simulation.max_iterations, cli.max_iterations);
        merge_opt(&mut config.simulation.max_elapsed_ms, cli.max_elapsed_ms);
        merge_opt(&mut config.simulation.area_mode, cli.area_mode);
        merge_opt(&mut config.engine.kind, cli.engine_kind);
        merge_opt(&mut config.engine.timeout_secs, cli.engine_timeout_secs);
        if let Some(ref program) = cli.engine_program {
            config.engine.program = Some(program.clone());
        }
        if !cli.engine_args.is_empty() {
            config.engine.args = cli.engine_args.clone();
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn merge_opt<T: Copy>(base: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *base = other;
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, slot: &mut Option<T>) {
    if let Ok(val) = std::env::var(key) {
        if let Ok(v) = val.parse::<T>() {
            *slot = Some(v);
        }
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
