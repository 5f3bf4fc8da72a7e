//! Shared test helpers
//!
//! `ScriptedOracle` stands in for the Generative Language API: it replays
//! queued replies in order and records every request it receives.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use trustscan::services::{GenerativeOracle, OracleError, OracleRequest};
use trustscan::workflow::WorkflowController;
use trustscan::AppState;
use trustscan_common::events::WorkflowPhase;

struct Reply {
    gate: Option<Arc<Notify>>,
    result: Result<String, OracleError>,
}

#[derive(Default)]
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<OracleRequest>>,
}

impl ScriptedOracle {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_ok(&self, text: impl Into<String>) {
        self.push(None, Ok(text.into()));
    }

    pub fn push_err(&self, error: OracleError) {
        self.push(None, Err(error));
    }

    /// Queue a reply that is held back until the returned gate is notified
    pub fn push_gated(&self, text: impl Into<String>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.push(Some(Arc::clone(&gate)), Ok(text.into()));
        gate
    }

    fn push(&self, gate: Option<Arc<Notify>>, result: Result<String, OracleError>) {
        self.replies.lock().unwrap().push_back(Reply { gate, result });
    }

    pub fn requests(&self) -> Vec<OracleRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeOracle for ScriptedOracle {
    async fn generate(&self, request: &OracleRequest) -> Result<String, OracleError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted reply left");
        if let Some(gate) = reply.gate {
            gate.notified().await;
        }
        reply.result
    }
}

pub fn candidate_json(id: &str, name: &str, address: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "address": address,
        "rating": 4.5,
        "reviewCount": 1200,
        "description": format!("{name} description.")
    })
}

pub fn ritz_candidates() -> String {
    json!([
        candidate_json("ritz-1", "The Ritz London", "150 Piccadilly, London W1J 9BR"),
        candidate_json("ritz-2", "The Ritz Restaurant", "150 Piccadilly, London"),
        candidate_json("ritz-3", "Ritz Club", "150 Piccadilly, London W1J 9BR, UK"),
    ])
    .to_string()
}

pub fn sushi_report() -> String {
    json!({
        "businessName": "Sushi NYC",
        "address": "1 Fish St, New York",
        "realPercentage": 92,
        "confidenceScore": 78,
        "sentimentBreakdown": {"positive": 70, "negative": 10, "neutral": 20}
    })
    .to_string()
}

/// App state around a scripted oracle with a slow progress ticker
pub fn test_app_state(oracle: Arc<ScriptedOracle>) -> AppState {
    test_app_state_with_interval(oracle, Duration::from_secs(3600))
}

pub fn test_app_state_with_interval(oracle: Arc<ScriptedOracle>, interval: Duration) -> AppState {
    AppState::with_oracle(oracle, "flash-test", "pro-test", interval)
}

/// Poll until the controller reaches `phase`
pub async fn wait_for_phase(controller: &WorkflowController, phase: WorkflowPhase) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if controller.snapshot().await.phase == phase {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("workflow never reached {phase}"));
}

/// Yield until the oracle has received `count` requests
pub async fn wait_for_requests(oracle: &ScriptedOracle, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while oracle.requests().len() < count {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("oracle never received {count} requests"));
}
