//! `emrel`: electromigration reliability estimation from the command line.

mod commands;
mod progress;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::{
    curve::CurveArgs, engine::EngineArgs, simulate::SimulateArgs, to_celsius::ToCelsiusArgs,
};

/// emrel - electromigration reliability estimator
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a trace through the reliability engine until it crosses the limit
    Simulate(SimulateArgs),

    /// Print the analytic reliability curve at a constant temperature
    Curve(CurveArgs),

    /// Evaluate one window of the native engine behind the file contract
    Engine(EngineArgs),

    /// Convert a Kelvin trace to Celsius
    ToCelsius(ToCelsiusArgs),
}

fn main() -> ExitCode {
    emrel_core::tracing::init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Curve(args) => commands::curve::run(args),
        Commands::Engine(args) => commands::engine::run(args),
        Commands::ToCelsius(args) => commands::to_celsius::run(args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
