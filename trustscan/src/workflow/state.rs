//! Workflow state machine
//!
//! The whole workflow is one immutable [`WorkflowState`] value advanced by a
//! pure [`reduce`] function. Each reducer arm is one row of the transition
//! table:
//!
//! | From | Trigger | To |
//! |---|---|---|
//! | any | non-blank query / quick-fill | DISCOVERING |
//! | DISCOVERING | candidates found (1+) | CANDIDATES_READY |
//! | DISCOVERING | no candidates | IDLE + "No places found" |
//! | DISCOVERING | discovery failed | IDLE + discovery message |
//! | CANDIDATES_READY | candidate selected | AUDITING |
//! | AUDITING | audit completed | RESULT_READY |
//! | AUDITING | audit failed | IDLE + audit message |
//! | RESULT_READY | start new audit | IDLE |
//! | any | restart | IDLE (initial) |
//!
//! Every oracle call is issued under a fresh request id. Resolutions carry
//! the id they were issued under and are rejected as stale unless it is
//! still the latest one.

use serde::Serialize;
use thiserror::Error;
use trustscan_common::events::{TrustScanEvent, WorkflowPhase};

use super::progress::{progress_label, PROGRESS_LABELS};
use crate::models::{AuditResult, Candidate};
use crate::services::{AuditError, DiscoveryError};

/// Shown when a search succeeds with zero matches
pub const NO_RESULTS_MESSAGE: &str = "No places found. Try a different query.";

/// Predefined quick-fill queries
pub const EXAMPLE_QUERIES: [&str; 4] = [
    "The Ritz London",
    "Sushi NYC",
    "Disneyland",
    "McDonalds Paris",
];

/// Process-wide workflow state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowState {
    /// Query text as entered
    pub query: String,
    pub phase: WorkflowPhase,
    /// Displayed error message
    pub error: Option<String>,
    /// Candidates from the latest search; displayed only in CANDIDATES_READY
    pub candidates: Vec<Candidate>,
    /// Latest report; displayed only in RESULT_READY
    pub result: Option<AuditResult>,
    /// Index into the progress labels while busy
    pub progress_step: usize,
    /// Latest issued oracle request id (0 = none yet)
    pub request_id: u64,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            query: String::new(),
            phase: WorkflowPhase::Idle,
            error: None,
            candidates: Vec::new(),
            result: None,
            progress_step: 0,
            request_id: 0,
        }
    }
}

impl WorkflowState {
    pub fn is_discovering(&self) -> bool {
        self.phase == WorkflowPhase::Discovering
    }

    pub fn is_auditing(&self) -> bool {
        self.phase == WorkflowPhase::Auditing
    }

    /// Candidates to render (empty outside CANDIDATES_READY)
    pub fn visible_candidates(&self) -> &[Candidate] {
        if self.phase == WorkflowPhase::CandidatesReady {
            &self.candidates
        } else {
            &[]
        }
    }

    /// Report to render (None outside RESULT_READY)
    pub fn visible_result(&self) -> Option<&AuditResult> {
        if self.phase == WorkflowPhase::ResultReady {
            self.result.as_ref()
        } else {
            None
        }
    }

    pub fn progress_label(&self) -> &'static str {
        progress_label(self.progress_step)
    }

    /// Quick-fill chips are offered only when nothing else is on display
    pub fn shows_examples(&self) -> bool {
        self.phase == WorkflowPhase::Idle && self.candidates.is_empty() && self.result.is_none()
    }

    /// Change notification describing this state
    pub fn to_event(&self) -> TrustScanEvent {
        TrustScanEvent::WorkflowStateChanged {
            phase: self.phase,
            request_id: self.request_id,
            progress_step: self.progress_step,
            progress_label: self.progress_label().to_string(),
            error: self.error.clone(),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Everything that can happen to the workflow
#[derive(Debug)]
pub enum Action {
    /// User submitted the search form
    Submit { query: String },
    /// User picked one of [`EXAMPLE_QUERIES`]
    QuickFill { index: usize },
    CandidatesFound {
        request_id: u64,
        candidates: Vec<Candidate>,
    },
    DiscoveryFailed {
        request_id: u64,
        error: DiscoveryError,
    },
    /// User picked a candidate to audit
    Select { candidate_id: String },
    AuditCompleted {
        request_id: u64,
        result: AuditResult,
    },
    AuditFailed {
        request_id: u64,
        error: AuditError,
    },
    ProgressTick { request_id: u64 },
    /// "Start new audit" from the report
    StartNewAudit,
    /// Discard everything, as a page reload would
    Restart,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Submit { .. } => "submit",
            Action::QuickFill { .. } => "quick_fill",
            Action::CandidatesFound { .. } => "candidates_found",
            Action::DiscoveryFailed { .. } => "discovery_failed",
            Action::Select { .. } => "select",
            Action::AuditCompleted { .. } => "audit_completed",
            Action::AuditFailed { .. } => "audit_failed",
            Action::ProgressTick { .. } => "progress_tick",
            Action::StartNewAudit => "start_new_audit",
            Action::Restart => "restart",
        }
    }
}

/// Oracle call the controller must issue after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Discover { request_id: u64, query: String },
    Audit { request_id: u64, candidate: Candidate },
}

impl Effect {
    pub fn request_id(&self) -> u64 {
        match self {
            Effect::Discover { request_id, .. } | Effect::Audit { request_id, .. } => *request_id,
        }
    }
}

/// Result of an accepted action
#[derive(Debug)]
pub struct Transition {
    pub state: WorkflowState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn to(state: WorkflowState) -> Self {
        Self {
            state,
            effect: None,
        }
    }
}

/// Why an action left the state untouched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Query is blank")]
    BlankQuery,

    #[error("No example query at index {0}")]
    UnknownExample(usize),

    #[error("Cannot select a candidate while {0}")]
    NotSelectable(WorkflowPhase),

    #[error("Candidate not in the current list: {0}")]
    UnknownCandidate(String),

    #[error("No audit result to clear while {0}")]
    NothingToReset(WorkflowPhase),

    #[error("Response for request {received} is stale (current request {current}, phase {phase})")]
    Stale {
        received: u64,
        current: u64,
        phase: WorkflowPhase,
    },
}

/// Apply `action` to `state`
pub fn reduce(state: &WorkflowState, action: Action) -> Result<Transition, Rejection> {
    match action {
        Action::Submit { query } => submit(state, query),

        Action::QuickFill { index } => {
            let query = EXAMPLE_QUERIES
                .get(index)
                .ok_or(Rejection::UnknownExample(index))?;
            submit(state, (*query).to_string())
        }

        Action::CandidatesFound {
            request_id,
            candidates,
        } => {
            ensure_current(state, request_id, WorkflowPhase::Discovering)?;
            let next = if candidates.is_empty() {
                WorkflowState {
                    phase: WorkflowPhase::Idle,
                    error: Some(NO_RESULTS_MESSAGE.to_string()),
                    candidates: Vec::new(),
                    ..state.clone()
                }
            } else {
                WorkflowState {
                    phase: WorkflowPhase::CandidatesReady,
                    candidates,
                    ..state.clone()
                }
            };
            Ok(Transition::to(next))
        }

        Action::DiscoveryFailed { request_id, error } => {
            ensure_current(state, request_id, WorkflowPhase::Discovering)?;
            Ok(Transition::to(WorkflowState {
                phase: WorkflowPhase::Idle,
                error: Some(error.user_message().to_string()),
                candidates: Vec::new(),
                ..state.clone()
            }))
        }

        Action::Select { candidate_id } => {
            if state.phase != WorkflowPhase::CandidatesReady {
                return Err(Rejection::NotSelectable(state.phase));
            }
            let candidate = state
                .candidates
                .iter()
                .find(|c| c.id == candidate_id)
                .cloned()
                .ok_or(Rejection::UnknownCandidate(candidate_id))?;

            let request_id = state.request_id + 1;
            Ok(Transition {
                state: WorkflowState {
                    phase: WorkflowPhase::Auditing,
                    error: None,
                    result: None,
                    progress_step: 0,
                    request_id,
                    ..state.clone()
                },
                effect: Some(Effect::Audit {
                    request_id,
                    candidate,
                }),
            })
        }

        Action::AuditCompleted { request_id, result } => {
            ensure_current(state, request_id, WorkflowPhase::Auditing)?;
            Ok(Transition::to(WorkflowState {
                phase: WorkflowPhase::ResultReady,
                result: Some(result),
                candidates: Vec::new(),
                ..state.clone()
            }))
        }

        Action::AuditFailed { request_id, error } => {
            ensure_current(state, request_id, WorkflowPhase::Auditing)?;
            Ok(Transition::to(WorkflowState {
                phase: WorkflowPhase::Idle,
                error: Some(error.user_message().to_string()),
                candidates: Vec::new(),
                ..state.clone()
            }))
        }

        Action::ProgressTick { request_id } => {
            if request_id != state.request_id || !state.phase.is_busy() {
                return Err(stale(state, request_id));
            }
            Ok(Transition::to(WorkflowState {
                progress_step: (state.progress_step + 1).min(PROGRESS_LABELS.len() - 1),
                ..state.clone()
            }))
        }

        Action::StartNewAudit => {
            if state.phase != WorkflowPhase::ResultReady {
                return Err(Rejection::NothingToReset(state.phase));
            }
            Ok(Transition::to(WorkflowState {
                phase: WorkflowPhase::Idle,
                result: None,
                candidates: Vec::new(),
                ..state.clone()
            }))
        }

        // Bump the id so any call still in flight resolves as stale
        Action::Restart => Ok(Transition::to(WorkflowState {
            request_id: state.request_id + 1,
            ..WorkflowState::default()
        })),
    }
}

fn submit(state: &WorkflowState, query: String) -> Result<Transition, Rejection> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(Rejection::BlankQuery);
    }

    let request_id = state.request_id + 1;
    let effect = Effect::Discover {
        request_id,
        query: trimmed.to_string(),
    };

    Ok(Transition {
        state: WorkflowState {
            query,
            phase: WorkflowPhase::Discovering,
            error: None,
            candidates: Vec::new(),
            result: None,
            progress_step: 0,
            request_id,
        },
        effect: Some(effect),
    })
}

fn ensure_current(
    state: &WorkflowState,
    request_id: u64,
    expected: WorkflowPhase,
) -> Result<(), Rejection> {
    if request_id == state.request_id && state.phase == expected {
        Ok(())
    } else {
        Err(stale(state, request_id))
    }
}

fn stale(state: &WorkflowState, received: u64) -> Rejection {
    Rejection::Stale {
        received,
        current: state.request_id,
        phase: state.phase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentBreakdown;
    use crate::services::OracleError;

    fn candidate(id: &str, name: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: name.to_string(),
            address: format!("{name} address"),
            rating: 4.0,
            review_count: 10,
            description: "desc".to_string(),
        }
    }

    fn report() -> AuditResult {
        AuditResult {
            business_name: "Sushi NYC".to_string(),
            address: "1 Fish St".to_string(),
            real_percentage: 92.0,
            confidence_score: 78.0,
            sentiment_breakdown: SentimentBreakdown {
                positive: 70.0,
                negative: 10.0,
                neutral: 20.0,
            },
        }
    }

    fn apply(state: &WorkflowState, action: Action) -> Transition {
        reduce(state, action).expect("action should be accepted")
    }

    fn discovering(query: &str) -> WorkflowState {
        apply(&WorkflowState::default(), Action::Submit { query: query.to_string() }).state
    }

    fn candidates_ready() -> WorkflowState {
        let state = discovering("Sushi NYC");
        apply(
            &state,
            Action::CandidatesFound {
                request_id: state.request_id,
                candidates: vec![candidate("a", "Sushi NYC"), candidate("b", "Sushi Nakazawa")],
            },
        )
        .state
    }

    fn auditing() -> WorkflowState {
        apply(&candidates_ready(), Action::Select { candidate_id: "a".to_string() }).state
    }

    fn result_ready() -> WorkflowState {
        let state = auditing();
        apply(
            &state,
            Action::AuditCompleted {
                request_id: state.request_id,
                result: report(),
            },
        )
        .state
    }

    #[test]
    fn test_initial_state_is_idle() {
        let state = WorkflowState::default();
        assert_eq!(state.phase, WorkflowPhase::Idle);
        assert!(state.error.is_none());
        assert!(state.candidates.is_empty());
        assert!(state.result.is_none());
        assert!(state.shows_examples());
    }

    #[test]
    fn test_submit_starts_discovery_with_trimmed_query() {
        let transition = apply(
            &WorkflowState::default(),
            Action::Submit { query: "  The Ritz London ".to_string() },
        );

        assert_eq!(transition.state.phase, WorkflowPhase::Discovering);
        assert!(transition.state.is_discovering());
        assert_eq!(transition.state.query, "  The Ritz London ");
        assert_eq!(
            transition.effect,
            Some(Effect::Discover {
                request_id: 1,
                query: "The Ritz London".to_string(),
            })
        );
    }

    #[test]
    fn test_blank_query_rejected() {
        let result = reduce(&WorkflowState::default(), Action::Submit { query: " \t ".to_string() });
        assert_eq!(result.unwrap_err(), Rejection::BlankQuery);
    }

    #[test]
    fn test_quick_fill_behaves_like_submit() {
        let transition = apply(&WorkflowState::default(), Action::QuickFill { index: 1 });

        assert_eq!(transition.state.query, "Sushi NYC");
        assert_eq!(transition.state.phase, WorkflowPhase::Discovering);
        assert!(matches!(
            transition.effect,
            Some(Effect::Discover { ref query, .. }) if query == "Sushi NYC"
        ));
    }

    #[test]
    fn test_quick_fill_unknown_index_rejected() {
        let result = reduce(&WorkflowState::default(), Action::QuickFill { index: 4 });
        assert_eq!(result.unwrap_err(), Rejection::UnknownExample(4));
    }

    #[test]
    fn test_candidates_found_lists_them() {
        let state = candidates_ready();

        assert_eq!(state.phase, WorkflowPhase::CandidatesReady);
        assert_eq!(state.visible_candidates().len(), 2);
        assert!(state.visible_result().is_none());
        assert!(!state.shows_examples());
    }

    #[test]
    fn test_zero_candidates_sets_no_results_error() {
        let state = discovering("asdkfjasldkfj");
        let next = apply(
            &state,
            Action::CandidatesFound {
                request_id: state.request_id,
                candidates: Vec::new(),
            },
        )
        .state;

        assert_eq!(next.phase, WorkflowPhase::Idle);
        assert_eq!(next.error.as_deref(), Some("No places found. Try a different query."));
        assert!(next.candidates.is_empty());
    }

    #[test]
    fn test_discovery_failure_sets_fixed_message() {
        let state = discovering("q");
        let next = apply(
            &state,
            Action::DiscoveryFailed {
                request_id: state.request_id,
                error: DiscoveryError::Transport(OracleError::Network("down".to_string())),
            },
        )
        .state;

        assert_eq!(next.phase, WorkflowPhase::Idle);
        assert_eq!(
            next.error.as_deref(),
            Some("Could not find matching businesses. Try a more specific name.")
        );
    }

    #[test]
    fn test_select_issues_audit_for_that_candidate() {
        let state = candidates_ready();
        let transition = apply(&state, Action::Select { candidate_id: "b".to_string() });

        assert_eq!(transition.state.phase, WorkflowPhase::Auditing);
        assert_eq!(transition.state.request_id, state.request_id + 1);
        assert!(transition.state.visible_candidates().is_empty());
        match transition.effect {
            Some(Effect::Audit { candidate, request_id }) => {
                assert_eq!(candidate.name, "Sushi Nakazawa");
                assert_eq!(request_id, state.request_id + 1);
            }
            other => panic!("expected audit effect, got {other:?}"),
        }
    }

    #[test]
    fn test_select_unknown_candidate_rejected() {
        let result = reduce(&candidates_ready(), Action::Select { candidate_id: "zzz".to_string() });
        assert_eq!(result.unwrap_err(), Rejection::UnknownCandidate("zzz".to_string()));
    }

    #[test]
    fn test_select_outside_candidates_ready_rejected() {
        let result = reduce(&WorkflowState::default(), Action::Select { candidate_id: "a".to_string() });
        assert_eq!(result.unwrap_err(), Rejection::NotSelectable(WorkflowPhase::Idle));
    }

    #[test]
    fn test_audit_completed_shows_result_and_clears_candidates() {
        let state = result_ready();

        assert_eq!(state.phase, WorkflowPhase::ResultReady);
        assert_eq!(state.visible_result(), Some(&report()));
        assert!(state.candidates.is_empty());
    }

    #[test]
    fn test_audit_failure_returns_to_idle_without_candidates() {
        let state = auditing();
        let next = apply(
            &state,
            Action::AuditFailed {
                request_id: state.request_id,
                error: AuditError::Transport(OracleError::Network("timeout".to_string())),
            },
        )
        .state;

        assert_eq!(next.phase, WorkflowPhase::Idle);
        assert_eq!(next.error.as_deref(), Some("Failed to audit this place. Try another."));
        assert!(next.candidates.is_empty());
    }

    #[test]
    fn test_malformed_audit_uses_same_message() {
        let state = auditing();
        let next = apply(
            &state,
            Action::AuditFailed {
                request_id: state.request_id,
                error: AuditError::MalformedResponse("missing field".to_string()),
            },
        )
        .state;

        assert_eq!(next.error.as_deref(), Some(crate::services::AUDIT_FAILED_MESSAGE));
    }

    #[test]
    fn test_start_new_audit_clears_result() {
        let next = apply(&result_ready(), Action::StartNewAudit).state;

        assert_eq!(next.phase, WorkflowPhase::Idle);
        assert!(next.result.is_none());
        assert!(next.candidates.is_empty());
        assert!(next.shows_examples());
    }

    #[test]
    fn test_start_new_audit_outside_result_rejected() {
        let result = reduce(&candidates_ready(), Action::StartNewAudit);
        assert_eq!(
            result.unwrap_err(),
            Rejection::NothingToReset(WorkflowPhase::CandidatesReady)
        );
    }

    #[test]
    fn test_submit_from_result_clears_previous_audit() {
        let transition = apply(&result_ready(), Action::Submit { query: "Disneyland".to_string() });

        assert_eq!(transition.state.phase, WorkflowPhase::Discovering);
        assert!(transition.state.result.is_none());
        assert!(transition.state.candidates.is_empty());
        assert!(transition.state.error.is_none());
    }

    #[test]
    fn test_superseded_discovery_response_is_stale() {
        let first = discovering("first");
        let second = apply(&first, Action::Submit { query: "second".to_string() }).state;

        let result = reduce(
            &second,
            Action::CandidatesFound {
                request_id: first.request_id,
                candidates: vec![candidate("old", "Old Place")],
            },
        );

        assert!(matches!(result, Err(Rejection::Stale { .. })));
    }

    #[test]
    fn test_duplicate_resolution_is_stale() {
        let state = candidates_ready();
        let result = reduce(
            &state,
            Action::CandidatesFound {
                request_id: state.request_id,
                candidates: vec![candidate("x", "Extra")],
            },
        );

        assert!(matches!(result, Err(Rejection::Stale { .. })));
    }

    #[test]
    fn test_restart_invalidates_outstanding_audit() {
        let state = auditing();
        let restarted = apply(&state, Action::Restart).state;

        assert_eq!(restarted.phase, WorkflowPhase::Idle);
        assert!(restarted.request_id > state.request_id);

        let late = reduce(
            &restarted,
            Action::AuditCompleted {
                request_id: state.request_id,
                result: report(),
            },
        );
        assert!(matches!(late, Err(Rejection::Stale { .. })));
    }

    #[test]
    fn test_progress_tick_advances_and_caps() {
        let mut state = discovering("q");
        for _ in 0..10 {
            state = apply(&state, Action::ProgressTick { request_id: state.request_id }).state;
        }

        assert_eq!(state.progress_step, PROGRESS_LABELS.len() - 1);
        assert_eq!(state.progress_label(), "Calculating confidence...");
    }

    #[test]
    fn test_progress_resets_on_new_busy_phase() {
        let state = discovering("q");
        let state = apply(&state, Action::ProgressTick { request_id: state.request_id }).state;
        assert_eq!(state.progress_step, 1);

        let state = apply(
            &state,
            Action::CandidatesFound {
                request_id: state.request_id,
                candidates: vec![candidate("a", "A")],
            },
        )
        .state;
        let state = apply(&state, Action::Select { candidate_id: "a".to_string() }).state;

        assert_eq!(state.progress_step, 0);
    }

    #[test]
    fn test_progress_tick_outside_busy_phase_rejected() {
        let state = candidates_ready();
        let result = reduce(&state, Action::ProgressTick { request_id: state.request_id });
        assert!(matches!(result, Err(Rejection::Stale { .. })));
    }

    #[test]
    fn test_event_mirrors_state() {
        let state = WorkflowState {
            phase: WorkflowPhase::Auditing,
            progress_step: 1,
            request_id: 4,
            ..WorkflowState::default()
        };

        match state.to_event() {
            TrustScanEvent::WorkflowStateChanged {
                phase,
                request_id,
                progress_step,
                progress_label,
                error,
                ..
            } => {
                assert_eq!(phase, WorkflowPhase::Auditing);
                assert_eq!(request_id, 4);
                assert_eq!(progress_step, 1);
                assert_eq!(progress_label, PROGRESS_LABELS[1]);
                assert!(error.is_none());
            }
        }
    }
}
