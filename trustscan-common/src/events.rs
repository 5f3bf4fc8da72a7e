//! Event system for TrustScan
//!
//! Provides the shared event definitions and the EventBus used to push
//! workflow changes to connected UIs over SSE.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Workflow phase
///
/// Exactly one phase is active at a time. An error message may accompany
/// `Idle` and `CandidatesReady`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowPhase {
    /// Waiting for a query
    Idle,
    /// Candidate search in flight
    Discovering,
    /// Candidates listed, waiting for the user to pick one
    CandidatesReady,
    /// Authenticity audit in flight
    Auditing,
    /// Audit report on display
    ResultReady,
}

impl WorkflowPhase {
    /// True while an oracle call is outstanding
    pub fn is_busy(self) -> bool {
        matches!(self, WorkflowPhase::Discovering | WorkflowPhase::Auditing)
    }

    /// Stable name used in logs and SSE payloads
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowPhase::Idle => "IDLE",
            WorkflowPhase::Discovering => "DISCOVERING",
            WorkflowPhase::CandidatesReady => "CANDIDATES_READY",
            WorkflowPhase::Auditing => "AUDITING",
            WorkflowPhase::ResultReady => "RESULT_READY",
        }
    }
}

impl std::fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TrustScan event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TrustScanEvent {
    /// The workflow state changed
    ///
    /// Triggers:
    /// - SSE: progress label refresh, or a full page refresh on phase change
    WorkflowStateChanged {
        /// Phase after the change
        phase: WorkflowPhase,
        /// Latest issued oracle request id
        request_id: u64,
        /// Progress label index (meaningful while busy)
        progress_step: usize,
        /// Progress label text
        progress_label: String,
        /// Displayed error message, if any
        error: Option<String>,
        /// When the change was applied
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl TrustScanEvent {
    /// Event name used as the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            TrustScanEvent::WorkflowStateChanged { .. } => "WorkflowStateChanged",
        }
    }
}

/// Central event distribution bus
///
/// Uses tokio::broadcast internally: publishing never blocks, slow
/// subscribers observe `Lagged` instead of stalling producers, and
/// receivers clean up when dropped.
///
/// # Examples
///
/// ```
/// use trustscan_common::events::{EventBus, TrustScanEvent, WorkflowPhase};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(TrustScanEvent::WorkflowStateChanged {
///     phase: WorkflowPhase::Discovering,
///     request_id: 1,
///     progress_step: 0,
///     progress_label: "Scanning web feedback...".to_string(),
///     error: None,
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<TrustScanEvent>,
}

impl EventBus {
    /// Creates a new EventBus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<TrustScanEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: TrustScanEvent,
    ) -> Result<usize, broadcast::error::SendError<TrustScanEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: TrustScanEvent) {
        let _ = self.tx.send(event);
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
