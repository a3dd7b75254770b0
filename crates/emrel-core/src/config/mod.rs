//! Configuration system for emrel.
//! TOML-based, 4-layer resolution: CLI > env > project > user > defaults.

pub mod emrel_config;
pub mod engine_config;
pub mod model_config;
pub mod simulation_config;

pub use emrel_config::{CliOverrides, EmrelConfig};
pub use engine_config::{EngineConfig, EngineKind};
pub use model_config::ModelConfig;
pub use simulation_config::{AreaMode, SimulationConfig};
