//! # emrel-model
//!
//! Closed-form electromigration reliability model.
//!
//! ```text
//! L(T) = A0 * j^(-n) * exp(Ea / (k * T)) / Gamma(1 + 1/β)   (Black's equation)
//! R(t) = exp(-(t / L(T))^β)                                  (Weibull survival)
//! R    = exp(-(Σ Δt_j / L(T_j))^β)                           (varying temperature)
//! ```
//!
//! Times are in hours, temperatures in °C. Pure functions of time, temperature,
//! and an explicit [`EmModelParams`].

pub mod curve;
pub mod formula;
pub mod model;
pub mod params;
pub mod wearout;

pub use curve::{CurvePoint, ReferenceCurve};
pub use model::EmModel;
pub use params::EmModelParams;
pub use wearout::WearoutAccumulator;
