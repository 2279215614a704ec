//! Run controller
//!
//! Owns the console state and drives one request/response cycle per [run]:
//!
//! ```text
//! Idle ──run──> Running ──response──> Settled   (no failing phase)
//!                  │     └─response──> Failed    (service reported a failing phase)
//!                  └──transport error─> Failed    (synthetic execution failure)
//! ```
//!
//! There is no reset; a new run goes straight back to `Running`.
//!
//! State is published through a [tokio::sync::watch] channel: observers take
//! snapshots or wait for changes, and [run] is the only writer.
//!
//! Overlapping runs
//!
//!     Every run takes the next value of a monotonic generation counter. When a
//!     response arrives for a generation that is no longer the latest, it is
//!     dropped: the most recently started run wins, whatever order the responses
//!     come back in. The loading flag is released by a guard on every exit path of
//!     the latest run, including the run future being dropped mid-flight.
//!
//! [run]: RunController::run

use super::client::CompilerService;
use super::normalize::{
    failing_phase_banner, normalize, ArtifactFormat, Normalized, PhaseDisplayModel,
};
use super::phase::Phase;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Where the controller is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Settled,
    Failed,
}

/// Everything the presentation surface reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleState {
    pub status: RunStatus,
    pub phases: PhaseDisplayModel,
    pub failing_phase: Option<Phase>,
    pub loading: bool,
    /// Generation of the run this state belongs to, 0 before the first run
    pub generation: u64,
}

impl ConsoleState {
    /// `ERROR in {phase} PHASE` when the last run failed
    pub fn error_banner(&self) -> Option<String> {
        self.failing_phase.map(failing_phase_banner)
    }
}

/// How a call to [RunController::run] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Settled,
    Failed(Phase),
    /// A later run was started before this one finished; nothing was published
    Superseded,
}

pub struct RunController<S> {
    service: S,
    format: ArtifactFormat,
    state: watch::Sender<ConsoleState>,
    generation: AtomicU64,
}

impl<S: CompilerService> RunController<S> {
    pub fn new(service: S) -> Self {
        Self::with_format(service, ArtifactFormat::default())
    }

    pub fn with_format(service: S, format: ArtifactFormat) -> Self {
        let (state, _) = watch::channel(ConsoleState::default());
        RunController {
            service,
            format,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Receiver that observes every published state
    pub fn subscribe(&self) -> watch::Receiver<ConsoleState> {
        self.state.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ConsoleState {
        self.state.borrow().clone()
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Submit `source` and publish the outcome.
    ///
    /// Never fails: transport errors become an execution-phase failure.
    pub async fn run(&self, source: &str) -> RunOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!("run #{} started ({} bytes)", generation, source.len());

        self.state.send_modify(|state| {
            state.status = RunStatus::Running;
            state.phases = PhaseDisplayModel::default();
            state.failing_phase = None;
            state.loading = true;
            state.generation = generation;
        });
        let guard = LoadingGuard {
            state: &self.state,
            generation,
            armed: true,
        };

        let normalized = match self.service.run(source).await {
            Ok(response) => normalize(&response, self.format),
            Err(err) => {
                warn!("run #{} transport failure: {}", generation, err);
                Normalized::transport_failure(&err)
            }
        };

        guard.settle(normalized)
    }
}

/// Releases the loading flag of the latest run however the run ends
struct LoadingGuard<'a> {
    state: &'a watch::Sender<ConsoleState>,
    generation: u64,
    armed: bool,
}

impl LoadingGuard<'_> {
    fn settle(mut self, normalized: Normalized) -> RunOutcome {
        self.armed = false;
        let generation = self.generation;
        let failing_phase = normalized.failing_phase;

        let published = self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            state.status = if failing_phase.is_some() {
                RunStatus::Failed
            } else {
                RunStatus::Settled
            };
            state.phases = normalized.model;
            state.failing_phase = failing_phase;
            state.loading = false;
            true
        });

        if !published {
            debug!("run #{} superseded, response discarded", generation);
            return RunOutcome::Superseded;
        }
        match failing_phase {
            Some(phase) => {
                info!("run #{} failed in {} phase", generation, phase);
                RunOutcome::Failed(phase)
            }
            None => {
                info!("run #{} settled", generation);
                RunOutcome::Settled
            }
        }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let generation = self.generation;
        self.state.send_if_modified(|state| {
            if state.generation != generation || !state.loading {
                return false;
            }
            debug!("run #{} abandoned", generation);
            state.status = RunStatus::Idle;
            state.loading = false;
            true
        });
    }
}
