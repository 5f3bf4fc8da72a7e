//! Workflow action endpoints
//!
//! Each POST applies one user action to the workflow controller and answers
//! immediately; oracle calls run in the background and their outcome
//! arrives over `/events`. Malformed bodies and paths answer with the same
//! JSON error shape as rejected actions.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use trustscan_common::events::WorkflowPhase;

use crate::error::ApiResult;
use crate::workflow::{Dispatched, WorkflowState, EXAMPLE_QUERIES};
use crate::AppState;

/// POST /api/search request
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// POST /api/audit request
#[derive(Debug, Deserialize)]
pub struct AuditRequest {
    pub candidate_id: String,
}

/// Body of every accepted action
#[derive(Debug, Serialize)]
pub struct ActionAccepted {
    pub request_id: u64,
    pub phase: WorkflowPhase,
}

impl From<Dispatched> for ActionAccepted {
    fn from(dispatched: Dispatched) -> Self {
        Self {
            request_id: dispatched.request_id,
            phase: dispatched.phase,
        }
    }
}

/// GET /api/state response
#[derive(Debug, Serialize)]
pub struct StateResponse {
    #[serde(flatten)]
    pub state: WorkflowState,
    pub progress_label: &'static str,
    pub is_discovering: bool,
    pub is_auditing: bool,
    pub shows_examples: bool,
    pub example_queries: &'static [&'static str],
}

type Accepted = (StatusCode, Json<ActionAccepted>);

fn accepted(dispatched: Dispatched) -> Accepted {
    (StatusCode::ACCEPTED, Json(dispatched.into()))
}

/// GET /api/state
pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let snapshot = state.controller.snapshot().await;
    Json(StateResponse {
        progress_label: snapshot.progress_label(),
        is_discovering: snapshot.is_discovering(),
        is_auditing: snapshot.is_auditing(),
        shows_examples: snapshot.shows_examples(),
        example_queries: &EXAMPLE_QUERIES,
        state: snapshot,
    })
}

/// POST /api/search
pub async fn search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<Accepted> {
    let Json(request) = payload?;
    let dispatched = state.controller.submit_query(request.query).await?;
    Ok(accepted(dispatched))
}

/// POST /api/examples/:index
pub async fn quick_fill(
    State(state): State<AppState>,
    index: Result<Path<usize>, PathRejection>,
) -> ApiResult<Accepted> {
    let Path(index) = index?;
    let dispatched = state.controller.quick_fill(index).await?;
    Ok(accepted(dispatched))
}

/// POST /api/audit
pub async fn audit(
    State(state): State<AppState>,
    payload: Result<Json<AuditRequest>, JsonRejection>,
) -> ApiResult<Accepted> {
    let Json(request) = payload?;
    let dispatched = state.controller.select_candidate(request.candidate_id).await?;
    Ok(accepted(dispatched))
}

/// POST /api/reset
///
/// "Start new audit" from the report view
pub async fn reset(State(state): State<AppState>) -> ApiResult<Accepted> {
    let dispatched = state.controller.start_new_audit().await?;
    Ok(accepted(dispatched))
}

/// POST /api/restart
pub async fn restart(State(state): State<AppState>) -> ApiResult<Accepted> {
    let dispatched = state.controller.restart().await?;
    Ok(accepted(dispatched))
}

/// Build workflow action routes
pub fn action_routes() -> Router<AppState> {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/search", post(search))
        .route("/api/examples/:index", post(quick_fill))
        .route("/api/audit", post(audit))
        .route("/api/reset", post(reset))
        .route("/api/restart", post(restart))
}
