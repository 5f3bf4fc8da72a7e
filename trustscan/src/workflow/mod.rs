//! Search-then-audit workflow
//!
//! [`state`] holds the pure transition function, [`controller`] drives it
//! against the oracle services and [`progress`] cycles the busy labels.

pub mod controller;
pub mod progress;
pub mod state;

pub use controller::{Dispatched, WorkflowController};
pub use progress::{progress_label, ProgressTicker, DEFAULT_PROGRESS_INTERVAL, PROGRESS_LABELS};
pub use state::{
    reduce, Action, Effect, Rejection, Transition, WorkflowState, EXAMPLE_QUERIES,
    NO_RESULTS_MESSAGE,
};
