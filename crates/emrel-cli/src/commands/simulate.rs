//! `emrel simulate <trace>`

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use tracing::info;

use emrel_core::config::{AreaMode, CliOverrides, EmrelConfig, EngineKind};
use emrel_core::errors::EmrelErrorCode;
use emrel_core::units::ms_to_years;
use emrel_model::{EmModel, EmModelParams};
use emrel_sim::{
    NativeEngine, ProcessEngine, ReliabilityEngine, RunSettings, SimulationDriver,
    SimulationReport, TemperatureTrace, TemperatureUnit,
};

use super::{coded, load_config, EXIT_FAILED};
use crate::progress::CsvProgress;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Temperature trace: tab-separated header of component names, then rows
    pub trace: PathBuf,

    /// Trace values are Kelvin rather than Celsius
    #[arg(long)]
    pub kelvin: bool,

    /// Simulated time per engine invocation, in milliseconds
    #[arg(long)]
    pub time_step_ms: Option<u64>,

    /// Reliability floor in (0, 1)
    #[arg(long)]
    pub r_limit: Option<f64>,

    /// Give up after this many windows
    #[arg(long)]
    pub max_iterations: Option<u64>,

    /// Give up after this much simulated time, in milliseconds
    #[arg(long)]
    pub max_elapsed_ms: Option<u64>,

    /// all-components or until-component-failure
    #[arg(long)]
    pub area_mode: Option<AreaMode>,

    /// native or external
    #[arg(long)]
    pub engine: Option<EngineKind>,

    /// External engine program
    #[arg(long)]
    pub program: Option<String>,

    /// Argument passed to the external program before the contract arguments (repeatable)
    #[arg(long = "program-arg", allow_hyphen_values = true)]
    pub program_args: Vec<String>,

    /// Per-invocation timeout for the external engine, in seconds
    #[arg(long)]
    pub engine_timeout_secs: Option<u64>,

    /// Config file replacing the project `emrel.toml`
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write the final report as JSON
    #[arg(long)]
    pub report_json: Option<PathBuf>,
}

impl SimulateArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            time_step_ms: self.time_step_ms,
            r_limit: self.r_limit,
            max_iterations: self.max_iterations,
            max_elapsed_ms: self.max_elapsed_ms,
            area_mode: self.area_mode,
            engine_kind: self.engine,
            engine_program: self.program.clone(),
            engine_args: self.program_args.clone(),
            engine_timeout_secs: self.engine_timeout_secs,
        }
    }
}

pub fn run(args: SimulateArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(args.config.as_deref(), Some(&args.overrides()))?;
    let unit = if args.kelvin {
        TemperatureUnit::Kelvin
    } else {
        TemperatureUnit::Celsius
    };
    let trace = TemperatureTrace::from_file(&args.trace, unit).map_err(coded)?;
    let settings = RunSettings::from_config(&config.simulation).map_err(coded)?;
    let engine = build_engine(&config)?;

    info!(
        trace = %args.trace.display(),
        components = trace.component_count(),
        engine = ?config.engine.effective_kind(),
        "starting simulation"
    );

    println!("{}", CsvProgress::header(trace.components()));
    let mut driver = SimulationDriver::new(engine).with_handler(Arc::new(CsvProgress));

    match driver.run(&trace, &settings) {
        Ok(report) => {
            print_summary(&report);
            if let Some(path) = &args.report_json {
                let json = serde_json::to_string_pretty(&report)?;
                std::fs::write(path, json)
                    .with_context(|| format!("cannot write {}", path.display()))?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            eprintln!(
                "{} (FAILED after {} iterations, {} years simulated)",
                failure.error.coded_string(),
                failure.iterations,
                ms_to_years(failure.elapsed_ms as f64)
            );
            Ok(ExitCode::from(EXIT_FAILED))
        }
    }
}

fn build_engine(config: &EmrelConfig) -> anyhow::Result<Box<dyn ReliabilityEngine>> {
    let engine: Box<dyn ReliabilityEngine> = match config.engine.effective_kind() {
        EngineKind::Native => {
            let params = EmModelParams::from_config(&config.model).map_err(coded)?;
            Box::new(NativeEngine::new(EmModel::new(params).map_err(coded)?))
        }
        EngineKind::External => Box::new(
            ProcessEngine::new(config.engine.effective_program())
                .map_err(coded)?
                .with_args(config.engine.args.iter().cloned())
                .with_timeout(Duration::from_secs(config.engine.effective_timeout_secs())),
        ),
    };
    Ok(engine)
}

fn print_summary(report: &SimulationReport) {
    eprintln!(
        "R <= {} after {} years",
        report.r_limit,
        report.elapsed_years()
    );
    if report.area_mode == AreaMode::UntilComponentFailure {
        for (name, crossed) in report
            .final_snapshot
            .components()
            .iter()
            .zip(&report.crossed_at_ms)
        {
            if let Some(ms) = crossed {
                eprintln!("{name} R <= {} after {} years", report.r_limit, ms_to_years(*ms as f64));
            }
        }
    }
    for (name, years) in report.areas_in_years() {
        eprintln!("Area under curve {name}: {years} years");
    }
}
