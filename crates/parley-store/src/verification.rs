use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock as StdRwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use parley_client::{AgentBackend, ClientError, ErrorCategory, HttpBackend};
use parley_types::GraphInfo;

use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepStatus {
    #[default]
    Pending,
    Loading,
    Success,
    Error,
}

/// Status of one verification step, with the error category and display
/// message when it failed.
#[derive(Debug, Clone, Default)]
pub struct StepState {
    pub status: StepStatus,
    pub message: Option<String>,
    pub category: Option<ErrorCategory>,
}

impl StepState {
    fn loading() -> Self {
        Self {
            status: StepStatus::Loading,
            message: None,
            category: None,
        }
    }

    fn success() -> Self {
        Self {
            status: StepStatus::Success,
            message: None,
            category: None,
        }
    }

    fn failure(err: &ClientError) -> Self {
        Self {
            status: StepStatus::Error,
            message: Some(err.to_string()),
            category: Some(err.category()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Success
    }
}

/// Snapshot of the whole verification attempt, surfaced to the UI as a
/// progress stepper.
#[derive(Debug, Clone, Default)]
pub struct VerificationState {
    pub ping: StepState,
    pub graph: StepState,
    pub is_verifying: bool,
    pub is_verified: bool,
    pub last_verification_time: Option<DateTime<Utc>>,
    pub graph_info: Option<GraphInfo>,
}

/// Drives the two-step connectivity check: reachability (`ping`), then graph
/// fetch. Both requests are issued together and tracked independently.
///
/// Invariants:
/// - `is_verified` holds only while both steps report success; any step error
///   forces it false and discards cached graph data.
/// - each step settles exactly once per attempt.
/// - a retry re-runs both steps from scratch; partial success from an earlier
///   attempt is never preserved.
/// - every attempt carries a generation number; completions from a superseded
///   attempt (a newer start, or a reset) are discarded.
#[derive(Debug, Default)]
pub struct VerificationSequencer {
    state: StdRwLock<VerificationState>,
    generation: AtomicU64,
}

fn read_state(
    lock: &StdRwLock<VerificationState>,
) -> RwLockReadGuard<'_, VerificationState> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_state(
    lock: &StdRwLock<VerificationState>,
) -> RwLockWriteGuard<'_, VerificationState> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl VerificationSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> VerificationState {
        read_state(&self.state).clone()
    }

    pub fn is_verified(&self) -> bool {
        read_state(&self.state).is_verified
    }

    /// Discard the current attempt and return to the pristine state
    /// (settings-form cancel). Any outstanding completions are invalidated.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *write_state(&self.state) = VerificationState::default();
    }

    /// Validate the configuration and run a full verification attempt.
    ///
    /// URL validation failures surface before any request is dispatched; both
    /// steps stay `Pending` in that case.
    pub async fn verify(&self, backend_url: &str, auth_token: Option<&str>) -> Result<bool> {
        let backend = HttpBackend::new(backend_url, auth_token)?;
        Ok(self.verify_with(&backend).await)
    }

    /// Run a verification attempt against an already-built backend.
    pub async fn verify_with(&self, backend: &dyn AgentBackend) -> bool {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = write_state(&self.state);
            *state = VerificationState::default();
            state.ping = StepState::loading();
            state.graph = StepState::loading();
            state.is_verifying = true;
        }

        // Ping first, graph immediately after; both outstanding together.
        // Each step settles the moment its own request completes, so the
        // faster step is visible while the slower one is still loading.
        let ping_step = async {
            let result = backend.ping().await;
            let mut state = write_state(&self.state);
            if self.generation.load(Ordering::SeqCst) == generation {
                state.ping = match &result {
                    Ok(_) => StepState::success(),
                    Err(err) => StepState::failure(err),
                };
            }
            result
        };
        let graph_step = async {
            let result = backend.fetch_graph().await;
            let mut state = write_state(&self.state);
            if self.generation.load(Ordering::SeqCst) == generation {
                match &result {
                    Ok(info) => {
                        state.graph = StepState::success();
                        state.graph_info = Some(info.clone());
                    }
                    Err(err) => {
                        state.graph = StepState::failure(err);
                    }
                }
            }
            result
        };
        let (ping_result, graph_result) = tokio::join!(ping_step, graph_step);

        let mut state = write_state(&self.state);
        if self.generation.load(Ordering::SeqCst) != generation {
            // Superseded while in flight; the newer attempt owns the state.
            return state.is_verified;
        }

        state.is_verified = state.ping.is_success() && state.graph.is_success();
        if state.is_verified {
            state.last_verification_time = Some(Utc::now());
        } else {
            // Never display stale graph data after a failed attempt.
            state.graph_info = None;
        }
        state.is_verifying = false;

        if let Err(err) = &ping_result {
            tracing::warn!(error = %err, "backend ping failed");
        }
        if let Err(err) = &graph_result {
            tracing::warn!(error = %err, "graph fetch failed");
        }
        state.is_verified
    }
}
