//! `emrel engine <time_step_ms> <trace> <checkpoint> <report>`
//!
//! The native engine as an external program, so `simulate --engine external`
//! can be pointed at `emrel engine`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use tracing::error;

use emrel_core::errors::EmrelErrorCode;
use emrel_model::{EmModel, EmModelParams};
use emrel_sim::engine::file_contract::serve_once;
use emrel_sim::{NativeEngine, TimeStep};

use super::{coded, load_config, EXIT_FAILED};

#[derive(Args, Debug)]
pub struct EngineArgs {
    /// Window length in milliseconds
    #[arg(allow_hyphen_values = true)]
    pub time_step_ms: i64,

    /// Celsius trace to read
    pub trace: PathBuf,

    /// Checkpoint to resume from (absent or empty on the first window) and overwrite
    pub checkpoint: PathBuf,

    /// Report to write
    pub report: PathBuf,

    /// Config file replacing the project `emrel.toml`
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: EngineArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(args.config.as_deref(), None)?;
    let params = EmModelParams::from_config(&config.model).map_err(coded)?;
    let mut engine = NativeEngine::new(EmModel::new(params).map_err(coded)?);
    let time_step = TimeStep::from_millis(args.time_step_ms).map_err(coded)?;

    match serve_once(&mut engine, time_step, &args.trace, &args.checkpoint, &args.report) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!(code = e.error_code(), "engine window failed");
            eprintln!("{}", e.coded_string());
            Ok(ExitCode::from(EXIT_FAILED))
        }
    }
}
