//! Driver behaviour against scripted engines.

use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use emrel_core::config::AreaMode;
use emrel_core::errors::{EmrelErrorCode, EngineInvocationError, SimulationError};
use emrel_model::EmModel;
use emrel_sim::engine::{EngineFault, EngineOutput, NativeEngine, ReliabilityEngine};
use emrel_sim::events::types::{ConvergedEvent, FailedEvent, IterationCompletedEvent};
use emrel_sim::{
    Checkpoint, ConvergenceGuard, ReliabilitySnapshot, RunPhase, RunSettings,
    SimulationDriver, SimulationEventHandler, TemperatureTrace, TemperatureUnit, Threshold,
    TimeStep,
};

const STEP_MS: i64 = 8_640_000_000;

fn trace() -> TemperatureTrace {
    TemperatureTrace::steady_state(&[("A", 50.0), ("B", 70.0)], TemperatureUnit::Celsius)
        .unwrap()
}

fn settings(r_limit: f64) -> RunSettings {
    RunSettings::new(
        TimeStep::from_millis(STEP_MS).unwrap(),
        Threshold::new(r_limit).unwrap(),
    )
}

/// Replays fixed windows (repeating the last one) and records the checkpoint
/// each call received.
struct ScriptedEngine {
    components: Vec<String>,
    windows: Vec<Vec<f64>>,
    calls: usize,
    received: Vec<Option<Vec<u8>>>,
}

impl ScriptedEngine {
    fn new(components: &[&str], windows: Vec<Vec<f64>>) -> Self {
        Self {
            components: components.iter().map(|c| c.to_string()).collect(),
            windows,
            calls: 0,
            received: Vec::new(),
        }
    }

    fn checkpoint_for(call: usize) -> Vec<u8> {
        // Not valid UTF-8 on purpose.
        vec![0xff, 0x00, call as u8, 0xfe]
    }
}

impl ReliabilityEngine for ScriptedEngine {
    fn evaluate(
        &mut self,
        _time_step: TimeStep,
        _trace: &TemperatureTrace,
        checkpoint: Option<&Checkpoint>,
    ) -> Result<EngineOutput, EngineFault> {
        self.received.push(checkpoint.map(|c| c.as_bytes().to_vec()));
        let index = self.calls.min(self.windows.len() - 1);
        let values = self.windows[index].clone();
        let output = EngineOutput {
            snapshot: ReliabilitySnapshot::new(self.components.clone(), values)?,
            checkpoint: Checkpoint::from_bytes(Self::checkpoint_for(self.calls)),
        };
        self.calls += 1;
        Ok(output)
    }
}

struct FailingEngine;

impl ReliabilityEngine for FailingEngine {
    fn evaluate(
        &mut self,
        _time_step: TimeStep,
        _trace: &TemperatureTrace,
        _checkpoint: Option<&Checkpoint>,
    ) -> Result<EngineOutput, EngineFault> {
        Err(EngineInvocationError::AbnormalExit {
            status: "exit status: 2".into(),
            stderr: "license server unreachable".into(),
        }
        .into())
    }
}

#[test]
fn stops_on_the_first_window_at_or_below_the_limit() {
    let engine = ScriptedEngine::new(
        &["A", "B"],
        vec![vec![0.9, 0.8], vec![0.5, 0.7], vec![0.2, 0.01], vec![0.0, 0.0]],
    );
    let mut driver = SimulationDriver::new(engine);
    let report = driver.run(&trace(), &settings(0.01)).unwrap();

    assert_eq!(report.iterations, 3);
    assert_eq!(report.elapsed_ms, 3 * STEP_MS as u64);
    assert_eq!(driver.phase(), RunPhase::Converged);
    assert_eq!(driver.engine().calls, 3);
    assert_eq!(report.final_snapshot.values(), [0.2, 0.01]);
}

#[test]
fn area_is_the_rectangle_rule_over_every_window() {
    let engine = ScriptedEngine::new(
        &["A", "B"],
        vec![vec![0.9, 0.8], vec![0.5, 0.7], vec![0.2, 0.01]],
    );
    let mut driver = SimulationDriver::new(engine);
    let report = driver.run(&trace(), &settings(0.01)).unwrap();

    let h = TimeStep::from_millis(STEP_MS).unwrap().hours();
    assert!((report.area_hours[0] - h * (0.9 + 0.5 + 0.2)).abs() < 1e-6);
    assert!((report.area_hours[1] - h * (0.8 + 0.7 + 0.01)).abs() < 1e-6);
    assert_eq!(report.areas()[1].0, "B");
    assert_eq!(report.area_mode, AreaMode::AllComponents);
}

#[test]
fn until_component_failure_runs_until_every_component_crossed() {
    let engine = ScriptedEngine::new(
        &["A", "B"],
        vec![vec![0.9, 0.4], vec![0.6, 0.3], vec![0.4, 0.2], vec![0.1, 0.1]],
    );
    let mut driver = SimulationDriver::new(engine);
    let settings = settings(0.5).with_area_mode(AreaMode::UntilComponentFailure);
    let report = driver.run(&trace(), &settings).unwrap();

    // B crosses in window 1, A in window 3.
    assert_eq!(report.iterations, 3);
    let step = settings.time_step.as_millis();
    assert_eq!(report.crossed_at_ms, vec![Some(3 * step), Some(step)]);

    let h = settings.time_step.hours();
    assert!((report.area_hours[0] - (0.9 + 0.6 + 0.4) * h).abs() < 1e-6);
    assert!((report.area_hours[1] - 0.4 * h).abs() < 1e-9);
}

#[test]
fn all_components_mode_stops_at_the_first_crossing() {
    let engine = ScriptedEngine::new(
        &["A", "B"],
        vec![vec![0.9, 0.4], vec![0.6, 0.3], vec![0.4, 0.2]],
    );
    let mut driver = SimulationDriver::new(engine);
    let report = driver.run(&trace(), &settings(0.5)).unwrap();

    assert_eq!(report.iterations, 1);
    assert_eq!(report.crossed_at_ms, vec![None, Some(STEP_MS as u64)]);
}

#[test]
fn checkpoints_are_handed_back_byte_for_byte() {
    let engine = ScriptedEngine::new(
        &["A", "B"],
        vec![vec![0.9, 0.9], vec![0.8, 0.8], vec![0.7, 0.7], vec![0.0, 0.0]],
    );
    let mut driver = SimulationDriver::new(engine);
    driver.run(&trace(), &settings(0.01)).unwrap();

    let received = &driver.engine().received;
    assert_eq!(received.len(), 4);
    assert_eq!(received[0], None);
    for (k, bytes) in received.iter().enumerate().skip(1) {
        assert_eq!(bytes.as_deref(), Some(&ScriptedEngine::checkpoint_for(k - 1)[..]));
    }
    assert_eq!(
        driver.state().unwrap().checkpoint().unwrap().as_bytes(),
        ScriptedEngine::checkpoint_for(3)
    );
}

#[test]
fn failure_on_first_call_leaves_zero_area() {
    let mut driver = SimulationDriver::new(FailingEngine);
    let failure = driver.run(&trace(), &settings(0.01)).unwrap_err();

    assert!(matches!(
        failure.error,
        SimulationError::Engine(EngineInvocationError::AbnormalExit { .. })
    ));
    assert_eq!(failure.error_code(), "ENGINE_INVOCATION_ERROR");
    assert_eq!(failure.iterations, 0);
    assert_eq!(failure.elapsed_ms, 0);
    assert_eq!(driver.phase(), RunPhase::Failed);
    assert_eq!(driver.state().unwrap().area_hours(), [0.0, 0.0]);
}

#[test]
fn never_crossing_engine_hits_the_iteration_guard() {
    let engine = ScriptedEngine::new(&["A", "B"], vec![vec![0.99, 0.99]]);
    let mut driver = SimulationDriver::new(engine);
    let settings =
        settings(0.01).with_guard(ConvergenceGuard::iterations(NonZeroU64::new(5).unwrap()));
    let failure = driver.run(&trace(), &settings).unwrap_err();

    match &failure.error {
        SimulationError::ConvergenceTimeout {
            iterations,
            elapsed_ms,
        } => {
            assert_eq!(*iterations, 5);
            assert_eq!(*elapsed_ms, 5 * STEP_MS as u64);
        }
        other => panic!("expected convergence timeout, got {other:?}"),
    }
    assert_eq!(failure.error_code(), "CONVERGENCE_TIMEOUT");
    assert_eq!(driver.engine().calls, 5);
    assert_eq!(driver.phase(), RunPhase::Failed);
}

#[test]
fn elapsed_time_guard_bounds_the_run() {
    let engine = ScriptedEngine::new(&["A", "B"], vec![vec![0.99, 0.99]]);
    let mut driver = SimulationDriver::new(engine);
    let guard = ConvergenceGuard::iterations(NonZeroU64::new(1_000).unwrap())
        .with_max_elapsed_ms(NonZeroU64::new(2 * STEP_MS as u64 + 1).unwrap());
    let failure = driver
        .run(&trace(), &settings(0.01).with_guard(guard))
        .unwrap_err();
    assert_eq!(failure.iterations, 3);
}

#[test]
fn reordered_components_are_malformed_output() {
    let engine = ScriptedEngine::new(&["B", "A"], vec![vec![0.5, 0.5]]);
    let mut driver = SimulationDriver::new(engine);
    let failure = driver.run(&trace(), &settings(0.01)).unwrap_err();
    assert!(matches!(failure.error, SimulationError::MalformedOutput(_)));
    assert_eq!(failure.error_code(), "MALFORMED_OUTPUT");
    assert_eq!(failure.iterations, 0);
}

#[test]
fn out_of_range_reliability_is_malformed_output() {
    let engine = ScriptedEngine::new(&["A", "B"], vec![vec![0.9, 0.9], vec![1.2, 0.5]]);
    let mut driver = SimulationDriver::new(engine);
    let failure = driver.run(&trace(), &settings(0.01)).unwrap_err();
    assert!(matches!(failure.error, SimulationError::MalformedOutput(_)));
    assert_eq!(failure.iterations, 1);
    assert_eq!(failure.elapsed_ms, STEP_MS as u64);
}

#[test]
fn finished_driver_refuses_to_run_again() {
    let engine = ScriptedEngine::new(&["A", "B"], vec![vec![0.0, 0.0]]);
    let mut driver = SimulationDriver::new(engine);
    driver.run(&trace(), &settings(0.01)).unwrap();

    let failure = driver.run(&trace(), &settings(0.01)).unwrap_err();
    assert!(matches!(failure.error, SimulationError::AlreadyFinished { .. }));
    assert_eq!(driver.phase(), RunPhase::Converged);
    assert_eq!(driver.engine().calls, 1);
}

#[derive(Default)]
struct Recorder {
    windows: Mutex<Vec<(u64, f64)>>,
    converged: AtomicU64,
    failed: AtomicU64,
}

impl SimulationEventHandler for Recorder {
    fn on_iteration_completed(&self, event: &IterationCompletedEvent) {
        if let Ok(mut windows) = self.windows.lock() {
            windows.push((event.iteration, event.min_reliability));
        }
    }

    fn on_converged(&self, _event: &ConvergedEvent) {
        self.converged.fetch_add(1, Ordering::SeqCst);
    }

    fn on_failed(&self, _event: &FailedEvent) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn handlers_see_every_window_and_the_outcome() {
    let recorder = Arc::new(Recorder::default());
    let engine = ScriptedEngine::new(
        &["A", "B"],
        vec![vec![0.9, 0.8], vec![0.5, 0.7], vec![0.2, 0.01]],
    );
    let mut driver = SimulationDriver::new(engine).with_handler(recorder.clone());
    driver.run(&trace(), &settings(0.01)).unwrap();

    assert_eq!(
        *recorder.windows.lock().unwrap(),
        vec![(1, 0.8), (2, 0.5), (3, 0.01)]
    );
    assert_eq!(recorder.converged.load(Ordering::SeqCst), 1);
    assert_eq!(recorder.failed.load(Ordering::SeqCst), 0);

    let recorder = Arc::new(Recorder::default());
    let mut driver = SimulationDriver::new(FailingEngine).with_handler(recorder.clone());
    let _ = driver.run(&trace(), &settings(0.01));
    assert_eq!(recorder.failed.load(Ordering::SeqCst), 1);
}

#[test]
fn native_engine_tracks_the_closed_form_for_steady_temperature() {
    let trace =
        TemperatureTrace::steady_state(&[("C0", 50.0)], TemperatureUnit::Celsius).unwrap();
    let mut driver = SimulationDriver::new(NativeEngine::default());
    let settings = settings(0.01);
    let report = driver.run(&trace, &settings).unwrap();

    let model = EmModel::default();
    let hours = report.elapsed_hours();
    let closed = model.reliability_at(hours, 50.0).unwrap();
    assert!((report.final_snapshot.values()[0] - closed).abs() < 1e-9);
    assert!(closed <= 0.01);

    // One window earlier the component was still above the limit.
    let before = model
        .reliability_at(hours - settings.time_step.hours(), 50.0)
        .unwrap();
    assert!(before > 0.01);
}

#[test]
fn kelvin_traces_drive_the_native_engine_like_celsius() {
    let celsius =
        TemperatureTrace::steady_state(&[("C0", 80.0)], TemperatureUnit::Celsius).unwrap();
    let kelvin =
        TemperatureTrace::steady_state(&[("C0", 353.15)], TemperatureUnit::Kelvin).unwrap();

    let a = SimulationDriver::new(NativeEngine::default())
        .run(&celsius, &settings(0.01))
        .unwrap();
    let b = SimulationDriver::new(NativeEngine::default())
        .run(&kelvin, &settings(0.01))
        .unwrap();
    assert_eq!(a.iterations, b.iterations);
}
