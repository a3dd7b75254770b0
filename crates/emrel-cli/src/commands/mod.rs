//! Sub-command implementations. Each returns the process exit code; setup
//! errors (bad config, unreadable trace) come back as `anyhow::Error`.

pub mod curve;
pub mod engine;
pub mod simulate;
pub mod to_celsius;

use std::path::Path;

use anyhow::Context;

use emrel_core::config::{CliOverrides, EmrelConfig};
use emrel_core::errors::EmrelErrorCode;

/// Exit code for a run that ended in FAILED.
pub const EXIT_FAILED: u8 = 1;

/// Resolve configuration against the current directory.
pub fn load_config(
    explicit: Option<&Path>,
    overrides: Option<&CliOverrides>,
) -> anyhow::Result<EmrelConfig> {
    let root = std::env::current_dir().context("cannot determine the working directory")?;
    EmrelConfig::load(&root, explicit, overrides).map_err(coded)
}

/// Lift an emrel error into `anyhow`, keeping its `[CODE]` prefix.
pub fn coded<E>(e: E) -> anyhow::Error
where
    E: EmrelErrorCode + std::fmt::Display,
{
    anyhow::anyhow!(e.coded_string())
}
