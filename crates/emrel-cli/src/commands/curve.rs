//! `emrel curve --temperature <°C>`

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

use emrel_core::constants::{DEFAULT_CURVE_HORIZON_HOURS, DEFAULT_CURVE_STEP_HOURS};
use emrel_core::units::hours_to_years;
use emrel_model::{EmModel, EmModelParams};

use super::{coded, load_config};

#[derive(Args, Debug)]
pub struct CurveArgs {
    /// Constant temperature in °C
    #[arg(long, allow_hyphen_values = true)]
    pub temperature: f64,

    /// Curve length in hours
    #[arg(long, default_value_t = DEFAULT_CURVE_HORIZON_HOURS)]
    pub horizon_hours: f64,

    /// Sampling interval in hours
    #[arg(long, default_value_t = DEFAULT_CURVE_STEP_HOURS)]
    pub step_hours: f64,

    /// Also report when the curve first reaches this reliability
    #[arg(long)]
    pub r_limit: Option<f64>,

    /// Config file replacing the project `emrel.toml`
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Prints `time,R` rows with time in hours.
pub fn run(args: CurveArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(args.config.as_deref(), None)?;
    let params = EmModelParams::from_config(&config.model).map_err(coded)?;
    let model = EmModel::new(params).map_err(coded)?;
    let curve = model
        .reference_curve(args.temperature, args.horizon_hours, args.step_hours)
        .map_err(coded)?;

    let mut out = std::io::stdout().lock();
    writeln!(out, "time,R")?;
    for point in &curve.points {
        writeln!(out, "{},{}", point.hours, point.reliability)?;
    }

    eprintln!(
        "Characteristic lifetime at {} °C: {} hours ({} years)",
        curve.temperature_celsius,
        curve.lifetime_hours,
        hours_to_years(curve.lifetime_hours)
    );
    if let Some(r_limit) = args.r_limit {
        match curve.first_crossing(r_limit) {
            Some(hours) => eprintln!("R <= {r_limit} after {} years", hours_to_years(hours)),
            None => eprintln!("R stays above {r_limit} over the whole curve"),
        }
    }
    Ok(ExitCode::SUCCESS)
}
