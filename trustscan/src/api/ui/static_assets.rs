//! Static asset handlers for the TrustScan UI
//!
//! Embeds and serves CSS/JS files at compile time

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

const TRUSTSCAN_CSS: &str = include_str!("../../../static/trustscan.css");
const TRUSTSCAN_JS: &str = include_str!("../../../static/trustscan.js");

/// GET /static/trustscan.css
pub async fn serve_trustscan_css() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/css"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        TRUSTSCAN_CSS,
    )
        .into_response()
}

/// GET /static/trustscan.js
///
/// Page script: posts actions to the JSON API and follows `/events`
pub async fn serve_trustscan_js() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "application/javascript"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        TRUSTSCAN_JS,
    )
        .into_response()
}
