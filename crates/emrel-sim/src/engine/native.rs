//! In-process engine: cumulative wear-out per component.

use serde::{Deserialize, Serialize};
use tracing::trace;

use emrel_core::errors::EngineInvocationError;
use emrel_model::{EmModel, WearoutAccumulator};

use super::{EngineFault, EngineOutput, ReliabilityEngine};
use crate::checkpoint::Checkpoint;
use crate::settings::TimeStep;
use crate::snapshot::ReliabilitySnapshot;
use crate::trace::TemperatureTrace;

/// Checkpoint payload format understood by this engine.
pub const CHECKPOINT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct NativeCheckpoint {
    version: u32,
    /// Per-component `Σ Δt / L(T)`, in trace column order.
    sums: Vec<f64>,
}

/// Engine that evaluates `R = exp(-(Σ Δt/L(T))^β)` itself.
///
/// A window of `Δt` applies each trace row for `Δt / rows`, so a multi-row
/// trace acts as a temperature profile repeating once per window.
#[derive(Debug, Clone, Default)]
pub struct NativeEngine {
    model: EmModel,
}

impl NativeEngine {
    pub fn new(model: EmModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &EmModel {
        &self.model
    }

    fn restore(
        &self,
        checkpoint: Option<&Checkpoint>,
        components: usize,
    ) -> Result<Vec<WearoutAccumulator>, EngineInvocationError> {
        let checkpoint = match checkpoint {
            Some(c) if !c.is_empty() => c,
            _ => return Ok(vec![WearoutAccumulator::new(); components]),
        };

        let payload: NativeCheckpoint = serde_json::from_slice(checkpoint.as_bytes())
            .map_err(|e| EngineInvocationError::InvalidCheckpoint(e.to_string()))?;
        if payload.version != CHECKPOINT_VERSION {
            return Err(EngineInvocationError::InvalidCheckpoint(format!(
                "unsupported checkpoint version {} (expected {})",
                payload.version, CHECKPOINT_VERSION
            )));
        }
        if payload.sums.len() != components {
            return Err(EngineInvocationError::InvalidCheckpoint(format!(
                "checkpoint has {} sums but the trace has {} components",
                payload.sums.len(),
                components
            )));
        }

        let shape = self.model.params().weibull_shape;
        payload
            .sums
            .into_iter()
            .map(|sum| {
                WearoutAccumulator::resume(sum, shape)
                    .map_err(|e| EngineInvocationError::InvalidCheckpoint(e.to_string()))
            })
            .collect()
    }

    fn encode(accumulators: &[WearoutAccumulator]) -> Result<Checkpoint, EngineInvocationError> {
        let payload = NativeCheckpoint {
            version: CHECKPOINT_VERSION,
            sums: accumulators.iter().map(WearoutAccumulator::sum).collect(),
        };
        serde_json::to_vec(&payload)
            .map(Checkpoint::from_bytes)
            .map_err(|e| EngineInvocationError::Computation(e.to_string()))
    }
}

impl ReliabilityEngine for NativeEngine {
    fn evaluate(
        &mut self,
        time_step: TimeStep,
        trace: &TemperatureTrace,
        checkpoint: Option<&Checkpoint>,
    ) -> Result<EngineOutput, EngineFault> {
        let trace = trace.to_celsius();
        let mut accumulators = self.restore(checkpoint, trace.component_count())?;

        let slice_hours = time_step.hours() / trace.rows().len() as f64;
        for row in trace.rows() {
            for ((accumulator, &temperature), name) in
                accumulators.iter_mut().zip(row).zip(trace.components())
            {
                accumulator
                    .add_interval(&self.model, temperature, slice_hours)
                    .map_err(|e| {
                        EngineInvocationError::Computation(format!("component {name}: {e}"))
                    })?;
            }
        }

        let values: Vec<f64> = accumulators
            .iter()
            .map(WearoutAccumulator::reliability)
            .collect();
        trace!(components = values.len(), "native window evaluated");

        let snapshot = ReliabilitySnapshot::new(trace.components().to_vec(), values)?;
        let checkpoint = Self::encode(&accumulators)?;
        Ok(EngineOutput {
            snapshot,
            checkpoint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::TemperatureUnit;

    fn trace() -> TemperatureTrace {
        TemperatureTrace::steady_state(&[("C0", 50.0), ("C1", 80.0)], TemperatureUnit::Celsius)
            .unwrap()
    }

    #[test]
    fn first_window_starts_from_fresh_components() {
        let mut engine = NativeEngine::default();
        let step = TimeStep::from_millis(8_640_000_000).unwrap();
        let out = engine.evaluate(step, &trace(), None).unwrap();

        let expected = engine.model().reliability_at(step.hours(), 50.0).unwrap();
        assert!((out.snapshot.values()[0] - expected).abs() < 1e-12);
        assert!(out.snapshot.values()[1] < out.snapshot.values()[0]);
    }

    #[test]
    fn checkpoint_carries_accumulated_wear() {
        let mut engine = NativeEngine::default();
        let step = TimeStep::from_millis(8_640_000_000).unwrap();
        let first = engine.evaluate(step, &trace(), None).unwrap();
        let second = engine
            .evaluate(step, &trace(), Some(&first.checkpoint))
            .unwrap();

        let expected = engine.model().reliability_at(2.0 * step.hours(), 50.0).unwrap();
        assert!((second.snapshot.values()[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn empty_checkpoint_counts_as_first_window() {
        let mut engine = NativeEngine::default();
        let step = TimeStep::from_millis(1_000_000).unwrap();
        let a = engine.evaluate(step, &trace(), None).unwrap();
        let b = engine
            .evaluate(step, &trace(), Some(&Checkpoint::default()))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_foreign_or_mismatched_checkpoints() {
        let mut engine = NativeEngine::default();
        let step = TimeStep::from_millis(1_000).unwrap();
        for bytes in [
            &br#"{"version":2,"sums":[0.0,0.0]}"#[..],
            &br#"{"version":1,"sums":[0.0]}"#[..],
            &b"0.1 0.2"[..],
        ] {
            let result = engine.evaluate(step, &trace(), Some(&Checkpoint::from_bytes(bytes)));
            assert!(matches!(
                result,
                Err(EngineFault::Invocation(EngineInvocationError::InvalidCheckpoint(_)))
            ));
        }
    }

    #[test]
    fn multi_row_trace_splits_the_window() {
        let profile = TemperatureTrace::new(
            vec!["C0".into()],
            vec![vec![40.0], vec![60.0]],
            TemperatureUnit::Celsius,
        )
        .unwrap();
        let mut engine = NativeEngine::default();
        let step = TimeStep::from_millis(7_200_000_000).unwrap();
        let out = engine.evaluate(step, &profile, None).unwrap();

        let half = step.hours() / 2.0;
        let model = engine.model();
        let sum = half / model.characteristic_lifetime(40.0).unwrap()
            + half / model.characteristic_lifetime(60.0).unwrap();
        let expected = (-sum.powf(2.0)).exp();
        assert!((out.snapshot.values()[0] - expected).abs() < 1e-12);
    }
}
