//! The external optimizer seam.
//!
//! The load optimizer is a collaborator: the pipeline hands it the flight's
//! input files and reads back container positions and item assignments. Any
//! failure, including running past the deadline, sends the pipeline on to the
//! next tier.

use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::mpsc::{RecvTimeoutError, channel};
use std::thread;
use std::time::{Duration, Instant};

use ct_core::Real;
use ct_report::ModelVariant;
use ct_tables::FlightFiles;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum OptimizerError {
    #[error("optimizer not configured")]
    NotConfigured,

    #[error("failed to start optimizer '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("optimizer I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("optimizer exited with status {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    #[error("optimizer output is not a valid solution: {0}")]
    InvalidOutput(#[from] serde_json::Error),

    #[error("optimizer did not finish within {seconds:.0} s")]
    Timeout { seconds: f64 },

    #[error("optimizer found no solution (status {status})")]
    NoSolution { status: String },

    #[error("optimizer worker stopped without an answer")]
    Disconnected,
}

/// What the optimizer is asked to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveInputs {
    pub flight_path: String,
    pub files: FlightFiles,
    pub aircraft_type: String,
    pub arrival_airport: Option<String>,
    /// Positions the optimizer must leave empty. Passed through untouched.
    pub restricted_positions: Vec<String>,
    pub variant: ModelVariant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvedContainer {
    pub serial: String,
    #[serde(default)]
    pub uld_type: Option<String>,
    pub weight_kg: Real,
    #[serde(default)]
    pub max_weight_kg: Option<Real>,
    #[serde(default)]
    pub position: Option<String>,
}

/// Item `item_index` of the piece table goes into container `container_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAssignment {
    pub item_index: usize,
    pub container_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveOutcome {
    pub status: String,
    #[serde(default)]
    pub objective_value: Option<Real>,
    #[serde(default)]
    pub gap_percent: Option<Real>,
    #[serde(default)]
    pub runtime_seconds: Option<Real>,
    pub containers: Vec<SolvedContainer>,
    #[serde(default)]
    pub assignments: Vec<ItemAssignment>,
}

pub trait Optimizer: Send + Sync {
    fn solve(&self, inputs: &SolveInputs) -> Result<SolveOutcome, OptimizerError>;
}

/// Always fails; the pipeline then uses stored or estimated results.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableOptimizer;

impl Optimizer for UnavailableOptimizer {
    fn solve(&self, _inputs: &SolveInputs) -> Result<SolveOutcome, OptimizerError> {
        Err(OptimizerError::NotConfigured)
    }
}

/// Runs an external solver program.
///
/// The inputs are written to its stdin as JSON and a [`SolveOutcome`] JSON
/// document is read from its stdout. The process is killed once `timeout`
/// has passed.
#[derive(Debug, Clone)]
pub struct CommandOptimizer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

const POLL_INTERVAL: Duration = Duration::from_millis(50);

impl CommandOptimizer {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// From a `[program, args...]` list; `None` when the list is empty.
    pub fn from_command(command: &[String], timeout: Duration) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec(), timeout))
    }
}

impl Optimizer for CommandOptimizer {
    fn solve(&self, inputs: &SolveInputs) -> Result<SolveOutcome, OptimizerError> {
        let payload = serde_json::to_vec(inputs)?;
        let started = Instant::now();
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| OptimizerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Every pipe is serviced off-thread; from here on the only exits are
        // through the wait loop, which reaps the child or kills it.
        let stdout = child.stdout.take().map(|mut out| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                out.read_to_end(&mut buf).map(|_| buf)
            })
        });
        let stderr = child.stderr.take().map(|mut err| {
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = err.read_to_string(&mut buf);
                buf
            })
        });
        let stdin = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || stdin.write_all(&payload))
        });

        let status = loop {
            let polled = child.try_wait();
            let expired = started.elapsed() >= self.timeout;
            match polled {
                Ok(Some(status)) => break status,
                Ok(None) if !expired => thread::sleep(POLL_INTERVAL),
                Ok(None) => {
                    tracing::warn!(program = %self.program, "killing optimizer at deadline");
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(OptimizerError::Timeout {
                        seconds: self.timeout.as_secs_f64(),
                    });
                }
                Err(e) => {
                    tracing::warn!(program = %self.program, error = %e, "lost track of optimizer");
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(e.into());
                }
            }
        };

        // A solver may exit without reading all of its input.
        if let Some(Ok(Err(e))) = stdin.map(|h| h.join()) {
            tracing::debug!(program = %self.program, error = %e, "optimizer did not take its input");
        }

        let stdout = match stdout {
            Some(handle) => handle.join().map_err(|_| OptimizerError::Disconnected)??,
            None => Vec::new(),
        };
        let stderr = stderr.and_then(|h| h.join().ok()).unwrap_or_default();

        if !status.success() {
            return Err(OptimizerError::Failed {
                code: status.code(),
                stderr: last_line(&stderr),
            });
        }
        let outcome: SolveOutcome = serde_json::from_slice(&stdout)?;
        tracing::debug!(
            program = %self.program,
            status = %outcome.status,
            containers = outcome.containers.len(),
            elapsed_s = started.elapsed().as_secs_f64(),
            "optimizer finished"
        );
        Ok(outcome)
    }
}

fn last_line(text: &str) -> String {
    text.lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Runs any optimizer on a worker thread and gives up after `timeout`.
///
/// A worker that overruns is left to finish on its own; its answer is
/// discarded.
pub fn solve_with_deadline(
    optimizer: Arc<dyn Optimizer>,
    inputs: &SolveInputs,
    timeout: Duration,
) -> Result<SolveOutcome, OptimizerError> {
    let (tx, rx) = channel();
    let inputs = inputs.clone();
    thread::spawn(move || {
        let _ = tx.send(optimizer.solve(&inputs));
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(OptimizerError::Timeout {
            seconds: timeout.as_secs_f64(),
        }),
        Err(RecvTimeoutError::Disconnected) => Err(OptimizerError::Disconnected),
    }
}
