//! HTTP API handlers for trustscan
//!
//! JSON action endpoints, the SSE event stream, health/build info and the
//! server-rendered UI.

pub mod actions;
pub mod health;
pub mod sse;
pub mod ui;

pub use actions::action_routes;
pub use health::health_routes;
pub use sse::event_stream;
pub use ui::ui_routes;
