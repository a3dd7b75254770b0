//! Shared constants for the emrel workspace.

/// emrel version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---- Electromigration model (Black's equation + Weibull) ----

/// Activation energy in eV.
pub const DEFAULT_ACTIVATION_ENERGY: f64 = 0.48;

/// Boltzmann constant in eV/K.
pub const DEFAULT_BOLTZMANN_CONSTANT: f64 = 8.6173324e-5;

/// Current density j (A/cm²) entering `j^(-n)`.
pub const DEFAULT_CURRENT_DENSITY: f64 = 1_500_000.0;

/// Current-density exponent n.
pub const DEFAULT_CURRENT_DENSITY_EXPONENT: f64 = 1.1;

/// Cross-section constant A0 (cross section = 1um^2, material constant = 3*10^13).
pub const DEFAULT_CROSS_SECTION_CONSTANT: f64 = 30_000.0;

/// Weibull shape parameter β.
pub const DEFAULT_WEIBULL_SHAPE: f64 = 2.0;

/// Gamma(1 + 1/β) for β = 2.
pub const DEFAULT_GAMMA_CORRECTION: f64 = 0.88623;

// ---- Simulation driver ----

/// Default window per engine invocation: 100 days in milliseconds.
pub const DEFAULT_TIME_STEP_MS: u64 = 8_640_000_000;

/// Default reliability floor below which a component is considered failed.
pub const DEFAULT_R_LIMIT: f64 = 0.01;

/// Default iteration cap for a single run.
pub const DEFAULT_MAX_ITERATIONS: u64 = 100_000;

// ---- Engines ----

/// Default wall-clock budget for one external engine invocation, in seconds.
pub const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 300;

/// Default external engine program name.
pub const DEFAULT_ENGINE_PROGRAM: &str = "reliability_external";

// ---- Reference curve ----

/// Default reference curve horizon: 50 years in hours.
pub const DEFAULT_CURVE_HORIZON_HOURS: f64 = 24.0 * 365.0 * 50.0;

/// Default reference curve sampling step in hours.
pub const DEFAULT_CURVE_STEP_HOURS: f64 = 3_000.0;
