//! UI Routes - server-rendered HTML page for TrustScan
//!
//! # Structure
//! - **Page** (`page`): the single workflow page, rendered from a state snapshot
//! - **Gauge** (`gauge`): SVG percentage rings used by the report
//! - **Static Assets** (`static_assets`): CSS/JS file serving

use axum::{routing::get, Router};

use crate::AppState;

pub mod gauge;
pub mod page;
mod static_assets;

use page::root_page;
use static_assets::{serve_trustscan_css, serve_trustscan_js};

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_page))
        .route("/static/trustscan.css", get(serve_trustscan_css))
        .route("/static/trustscan.js", get(serve_trustscan_js))
}
