//! trustscan library interface
//!
//! Exposes the workflow, oracle services and HTTP router for the binary and
//! for integration testing.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod workflow;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use trustscan_common::events::EventBus;

use crate::services::{AuthenticityAuditor, CandidateFinder, GenerativeOracle};
use crate::workflow::WorkflowController;

/// Event bus capacity; a page holds at most one connection
pub const EVENT_BUS_CAPACITY: usize = 100;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The single search-then-audit workflow
    pub controller: Arc<WorkflowController>,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(controller: Arc<WorkflowController>, event_bus: EventBus) -> Self {
        Self {
            controller,
            event_bus,
            startup_time: Utc::now(),
        }
    }

    /// Wire finder, auditor and controller around one oracle
    pub fn with_oracle(
        oracle: Arc<dyn GenerativeOracle>,
        discovery_model: &str,
        audit_model: &str,
        progress_interval: Duration,
    ) -> Self {
        let event_bus = EventBus::new(EVENT_BUS_CAPACITY);
        let finder = CandidateFinder::new(Arc::clone(&oracle), discovery_model);
        let auditor = AuthenticityAuditor::new(oracle, audit_model);
        let controller =
            WorkflowController::new(finder, auditor, event_bus.clone(), progress_interval);
        Self::new(controller, event_bus)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        // UI routes (HTML page and assets)
        .merge(api::ui_routes())
        // API routes
        .merge(api::action_routes())
        .route("/events", get(api::event_stream))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
