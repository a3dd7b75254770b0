//! `emrel to-celsius <trace>`

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

use emrel_sim::{TemperatureTrace, TemperatureUnit};

use super::coded;

#[derive(Args, Debug)]
pub struct ToCelsiusArgs {
    /// Trace with values in Kelvin
    pub trace: PathBuf,
}

pub fn run(args: ToCelsiusArgs) -> anyhow::Result<ExitCode> {
    let trace = TemperatureTrace::from_file(&args.trace, TemperatureUnit::Kelvin)
        .map_err(coded)?
        .to_celsius();

    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", trace.components().join("\t"))?;
    for row in trace.rows() {
        let line: Vec<String> = row.iter().map(|c| format!("{c:.4}")).collect();
        writeln!(out, "{}", line.join("\t"))?;
    }
    Ok(ExitCode::SUCCESS)
}
