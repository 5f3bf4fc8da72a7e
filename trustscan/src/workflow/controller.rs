//! Workflow controller
//!
//! Owns the single [`WorkflowState`], feeds user actions and oracle
//! resolutions through [`reduce`], runs the resulting effects on background
//! tasks and keeps the progress ticker alive only while a call is in flight.
//! Every applied transition is published on the [`EventBus`].

use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use trustscan_common::events::{EventBus, WorkflowPhase};

use super::progress::ProgressTicker;
use super::state::{reduce, Action, Effect, Rejection, Transition, WorkflowState};
use crate::services::{AuthenticityAuditor, CandidateFinder};

/// Outcome of an accepted user action
#[derive(Debug)]
pub struct Dispatched {
    /// Latest request id after the action
    pub request_id: u64,
    /// Phase after the action
    pub phase: WorkflowPhase,
    /// Background oracle call started by the action, if any
    pub task: Option<JoinHandle<()>>,
}

struct Inner {
    state: WorkflowState,
    ticker: Option<ProgressTicker>,
}

pub struct WorkflowController {
    inner: Mutex<Inner>,
    finder: CandidateFinder,
    auditor: AuthenticityAuditor,
    event_bus: EventBus,
    progress_interval: Duration,
}

impl WorkflowController {
    pub fn new(
        finder: CandidateFinder,
        auditor: AuthenticityAuditor,
        event_bus: EventBus,
        progress_interval: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner {
                state: WorkflowState::default(),
                ticker: None,
            }),
            finder,
            auditor,
            event_bus,
            progress_interval,
        })
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> WorkflowState {
        self.inner.lock().await.state.clone()
    }

    /// True while a progress ticker task is running
    pub async fn is_progress_active(&self) -> bool {
        self.inner
            .lock()
            .await
            .ticker
            .as_ref()
            .is_some_and(ProgressTicker::is_running)
    }

    pub async fn submit_query(
        self: &Arc<Self>,
        query: impl Into<String>,
    ) -> Result<Dispatched, Rejection> {
        self.dispatch(Action::Submit {
            query: query.into(),
        })
        .await
    }

    pub async fn quick_fill(self: &Arc<Self>, index: usize) -> Result<Dispatched, Rejection> {
        self.dispatch(Action::QuickFill { index }).await
    }

    pub async fn select_candidate(
        self: &Arc<Self>,
        candidate_id: impl Into<String>,
    ) -> Result<Dispatched, Rejection> {
        self.dispatch(Action::Select {
            candidate_id: candidate_id.into(),
        })
        .await
    }

    pub async fn start_new_audit(self: &Arc<Self>) -> Result<Dispatched, Rejection> {
        self.dispatch(Action::StartNewAudit).await
    }

    pub async fn restart(self: &Arc<Self>) -> Result<Dispatched, Rejection> {
        self.dispatch(Action::Restart).await
    }

    /// Apply a user action and launch the oracle call it asks for
    async fn dispatch(self: &Arc<Self>, action: Action) -> Result<Dispatched, Rejection> {
        let name = action.name();
        let mut inner = self.inner.lock().await;

        let transition = reduce(&inner.state, action).map_err(|rejection| {
            debug!(action = name, %rejection, "Action rejected");
            rejection
        })?;

        let effect = self.commit(&mut inner, transition);
        let request_id = inner.state.request_id;
        let phase = inner.state.phase;
        info!(action = name, phase = %phase, request_id, "Workflow action applied");

        let task = effect.map(|effect| {
            inner.ticker = Some(self.start_ticker(effect.request_id()));
            let controller = Arc::clone(self);
            tokio::spawn(async move { controller.run_effect(effect).await })
        });

        Ok(Dispatched {
            request_id,
            phase,
            task,
        })
    }

    /// Apply an action that never launches further work
    ///
    /// Used for oracle resolutions and progress ticks.
    async fn apply(&self, action: Action) -> Result<(), Rejection> {
        let mut inner = self.inner.lock().await;
        let transition = reduce(&inner.state, action)?;
        if let Some(effect) = self.commit(&mut inner, transition) {
            warn!(request_id = effect.request_id(), "Resolution produced an effect; ignored");
        }
        Ok(())
    }

    /// Store the new state and publish it
    fn commit(&self, inner: &mut Inner, transition: Transition) -> Option<Effect> {
        inner.state = transition.state;
        if !inner.state.phase.is_busy() {
            inner.ticker = None;
        }

        self.event_bus.emit_lossy(inner.state.to_event());

        transition.effect
    }

    fn start_ticker(self: &Arc<Self>, request_id: u64) -> ProgressTicker {
        let controller: Weak<Self> = Arc::downgrade(self);
        ProgressTicker::start(self.progress_interval, move || {
            let controller = controller.clone();
            async move {
                match controller.upgrade() {
                    Some(controller) => controller
                        .apply(Action::ProgressTick { request_id })
                        .await
                        .is_ok(),
                    None => false,
                }
            }
        })
    }

    async fn run_effect(&self, effect: Effect) {
        let resolution = match effect {
            Effect::Discover { request_id, query } => {
                match self.finder.find_candidates(&query).await {
                    Ok(candidates) => Action::CandidatesFound {
                        request_id,
                        candidates,
                    },
                    Err(error) => {
                        warn!(request_id, query = %query, error = %error, "Candidate search failed");
                        Action::DiscoveryFailed { request_id, error }
                    }
                }
            }
            Effect::Audit {
                request_id,
                candidate,
            } => match self.auditor.audit(&candidate).await {
                Ok(result) => Action::AuditCompleted { request_id, result },
                Err(error) => {
                    warn!(
                        request_id,
                        candidate = %candidate.name,
                        error = %error,
                        "Authenticity audit failed"
                    );
                    Action::AuditFailed { request_id, error }
                }
            },
        };

        let name = resolution.name();
        if let Err(rejection) = self.apply(resolution).await {
            debug!(resolution = name, %rejection, "Discarding superseded oracle response");
        }
    }
}
