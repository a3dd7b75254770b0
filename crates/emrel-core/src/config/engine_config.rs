//! Reliability engine selection.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Which engine implementation the driver talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// In-process cumulative wear-out engine.
    #[default]
    Native,
    /// External program behind the file-based contract.
    External,
}

impl std::str::FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" => Ok(Self::Native),
            "external" => Ok(Self::External),
            other => Err(format!("unknown engine kind: {other}")),
        }
    }
}

/// Configuration for the reliability engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine implementation. Default: native.
    pub kind: Option<EngineKind>,
    /// External program path. Default: `reliability_external`.
    pub program: Option<String>,
    /// Arguments placed before the engine contract arguments.
    #[serde(default)]
    pub args: Vec<String>,
    /// Per-invocation timeout in seconds. Default: 300.
    pub timeout_secs: Option<u64>,
}

impl EngineConfig {
    pub fn effective_kind(&self) -> EngineKind {
        self.kind.unwrap_or_default()
    }

    pub fn effective_program(&self) -> &str {
        self.program
            .as_deref()
            .unwrap_or(constants::DEFAULT_ENGINE_PROGRAM)
    }

    pub fn effective_timeout_secs(&self) -> u64 {
        self.timeout_secs
            .unwrap_or(constants::DEFAULT_ENGINE_TIMEOUT_SECS)
    }
}
