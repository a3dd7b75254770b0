//! External-process engine behind a file contract.
//!
//! ```text
//! <program> [args...] <time_step_ms> <trace_file> <checkpoint_file> <report_file>
//! ```
//!
//! The program reads the trace and (if present) the checkpoint, then writes the
//! report and the new checkpoint. All files live in a private temporary
//! directory owned by the engine, so a run can never pick up a checkpoint left
//! behind by an earlier run.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tracing::{debug, warn};

use emrel_core::constants::DEFAULT_ENGINE_TIMEOUT_SECS;
use emrel_core::errors::EngineInvocationError;

use super::{EngineFault, EngineOutput, ReliabilityEngine};
use crate::checkpoint::Checkpoint;
use crate::settings::TimeStep;
use crate::snapshot::parse_report;
use crate::trace::TemperatureTrace;

const TRACE_FILE: &str = "trace.tsv";
const CHECKPOINT_FILE: &str = "checkpoint";
const REPORT_FILE: &str = "report.tsv";
const STDERR_FILE: &str = "stderr.log";

/// Longest stderr excerpt kept in an error.
const STDERR_EXCERPT: usize = 4096;

/// Runs an external program once per window.
#[derive(Debug)]
pub struct ProcessEngine {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
    workdir: TempDir,
}

impl ProcessEngine {
    pub fn new(program: impl Into<PathBuf>) -> Result<Self, EngineInvocationError> {
        let workdir = tempfile::Builder::new()
            .prefix("emrel-engine-")
            .tempdir()
            .map_err(|e| EngineInvocationError::Io {
                path: std::env::temp_dir().display().to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            program: program.into(),
            args: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_ENGINE_TIMEOUT_SECS),
            workdir,
        })
    }

    /// Arguments placed before the contract arguments.
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }

    fn path(&self, name: &str) -> PathBuf {
        self.workdir.path().join(name)
    }

    fn stage_inputs(
        &self,
        trace: &TemperatureTrace,
        checkpoint: Option<&Checkpoint>,
    ) -> Result<(), EngineInvocationError> {
        write_file(&self.path(TRACE_FILE), trace.to_celsius().to_tsv().as_bytes())?;

        let checkpoint_path = self.path(CHECKPOINT_FILE);
        match checkpoint {
            Some(c) => write_file(&checkpoint_path, c.as_bytes())?,
            None => remove_if_present(&checkpoint_path)?,
        }
        remove_if_present(&self.path(REPORT_FILE))
    }

    fn spawn(&self, time_step: TimeStep) -> Result<Child, EngineInvocationError> {
        let stderr_path = self.path(STDERR_FILE);
        let stderr = File::create(&stderr_path).map_err(|e| io_error(&stderr_path, e))?;

        Command::new(&self.program)
            .args(&self.args)
            .arg(time_step.as_millis().to_string())
            .arg(self.path(TRACE_FILE))
            .arg(self.path(CHECKPOINT_FILE))
            .arg(self.path(REPORT_FILE))
            .current_dir(self.workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(|e| EngineInvocationError::Spawn {
                program: self.program.display().to_string(),
                message: e.to_string(),
            })
    }

    /// Block until the child exits or the timeout expires; on expiry the child
    /// is killed and reaped. A timeout too large to represent never expires.
    fn wait(&self, child: &mut Child) -> Result<ExitStatus, EngineInvocationError> {
        let deadline = Instant::now().checked_add(self.timeout);
        let mut backoff = Duration::from_millis(1);
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {}
                Err(e) => {
                    return Err(EngineInvocationError::Io {
                        path: self.program.display().to_string(),
                        message: e.to_string(),
                    })
                }
            }

            let now = Instant::now();
            let mut pause = backoff;
            if let Some(deadline) = deadline {
                if now >= deadline {
                    if let Err(e) = child.kill() {
                        warn!(error = %e, "failed to kill timed-out engine");
                    }
                    let _ = child.wait();
                    return Err(EngineInvocationError::Timeout {
                        timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    });
                }
                pause = pause.min(deadline - now);
            }
            std::thread::sleep(pause);
            backoff = (backoff * 2).min(Duration::from_millis(50));
        }
    }

    fn stderr_excerpt(&self) -> String {
        let mut text = String::new();
        if let Ok(mut file) = File::open(self.path(STDERR_FILE)) {
            let _ = file.read_to_string(&mut text);
        }
        let text = text.trim();
        match text.char_indices().nth(STDERR_EXCERPT) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text.to_string(),
        }
    }
}

impl ReliabilityEngine for ProcessEngine {
    fn evaluate(
        &mut self,
        time_step: TimeStep,
        trace: &TemperatureTrace,
        checkpoint: Option<&Checkpoint>,
    ) -> Result<EngineOutput, EngineFault> {
        self.stage_inputs(trace, checkpoint)?;

        let started = Instant::now();
        let mut child = self.spawn(time_step)?;
        let status = self.wait(&mut child)?;
        debug!(
            program = %self.program.display(),
            engine_wall_time_ms = started.elapsed().as_millis() as u64,
            %status,
            "engine invocation finished"
        );

        if !status.success() {
            return Err(EngineInvocationError::AbnormalExit {
                status: status.to_string(),
                stderr: self.stderr_excerpt(),
            }
            .into());
        }

        let report_path = self.path(REPORT_FILE);
        let report = fs::read_to_string(&report_path).map_err(|e| io_error(&report_path, e))?;
        let snapshot = parse_report(&report)?;

        let checkpoint_path = self.path(CHECKPOINT_FILE);
        let bytes = fs::read(&checkpoint_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => EngineInvocationError::MissingCheckpoint {
                path: checkpoint_path.display().to_string(),
            },
            _ => io_error(&checkpoint_path, e),
        })?;

        Ok(EngineOutput {
            snapshot,
            checkpoint: Checkpoint::from_bytes(bytes),
        })
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), EngineInvocationError> {
    fs::write(path, bytes).map_err(|e| io_error(path, e))
}

fn remove_if_present(path: &Path) -> Result<(), EngineInvocationError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error(path, e)),
    }
}

fn io_error(path: &Path, e: std::io::Error) -> EngineInvocationError {
    EngineInvocationError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}
