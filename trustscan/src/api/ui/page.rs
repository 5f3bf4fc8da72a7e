//! Main page rendering
//!
//! The page is a pure function of the workflow state. The browser script
//! posts user actions to the JSON API and reloads on every phase change.

use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use std::fmt::Write;

use super::gauge::{authenticity_color, display_percentage, render_gauge, CONFIDENCE_COLOR};
use crate::models::{AuditResult, Candidate, SentimentBreakdown};
use crate::workflow::{WorkflowState, EXAMPLE_QUERIES};
use crate::AppState;

/// GET /
pub async fn root_page(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.controller.snapshot().await;
    Html(render_page(&snapshot))
}

/// Escape text for HTML element and attribute content
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Reception word for the summary sentence
pub fn reception_word(sentiment: &SentimentBreakdown) -> &'static str {
    if sentiment.positive > 50.0 {
        "positive"
    } else if sentiment.negative > 30.0 {
        "critical"
    } else {
        "mixed"
    }
}

pub fn render_page(state: &WorkflowState) -> String {
    let busy = state.phase.is_busy();
    let search_label = if state.is_discovering() {
        "Searching..."
    } else {
        "Search"
    };
    let disabled = if busy { " disabled" } else { "" };

    let mut body = String::new();

    if state.shows_examples() {
        body.push_str(&render_examples());
    }
    if let Some(error) = &state.error {
        let _ = write!(
            body,
            r#"<div class="error-banner" role="alert">{}</div>"#,
            escape_html(error)
        );
    }

    let candidates = state.visible_candidates();
    if !candidates.is_empty() {
        body.push_str(&render_candidates(candidates));
    }
    if state.is_auditing() {
        body.push_str(&render_progress(state.progress_label()));
    }
    if let Some(result) = state.visible_result() {
        body.push_str(&render_report(result));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>TrustScan - Review Integrity Audit</title>
    <link rel="stylesheet" href="/static/trustscan.css">
</head>
<body data-phase="{phase}" data-request-id="{request_id}">
    <header>
        <div class="brand" id="restart" title="Start over">
            <span class="brand-mark">&#x1F6E1;</span>
            <h1>TrustScan</h1>
        </div>
        <span class="connection" id="connection-status">Connecting...</span>
    </header>
    <main>
        <div class="hero">
            <h2>Review Integrity Audit</h2>
            <p>Find any business to check if its Google reviews are real.</p>
        </div>
        <form id="search-form" class="search">
            <input type="text" name="query" id="query" value="{query}" placeholder="Search business name and city..." autocomplete="off">
            <button type="submit" id="search-button"{disabled}>{search_label}</button>
        </form>
        {body}
    </main>
    <footer>Neural Review Audit Engine V3.1</footer>
    <script src="/static/trustscan.js"></script>
</body>
</html>
"#,
        phase = state.phase,
        request_id = state.request_id,
        query = escape_html(&state.query),
        disabled = disabled,
        search_label = search_label,
        body = body,
    )
}

fn render_examples() -> String {
    let chips: String = EXAMPLE_QUERIES
        .iter()
        .enumerate()
        .map(|(index, example)| {
            format!(
                r#"<button type="button" class="example-chip" data-example-index="{index}">{}</button>"#,
                escape_html(example)
            )
        })
        .collect();
    format!(r#"<div class="examples">{chips}</div>"#)
}

fn render_candidates(candidates: &[Candidate]) -> String {
    let mut html = String::from(
        r#"<section class="candidates"><h3 class="section-title">Select the exact place:</h3>"#,
    );
    for candidate in candidates {
        let _ = write!(
            html,
            r#"<div class="candidate-card" data-candidate-id="{id}">
  <div class="candidate-info">
    <h4>{name}</h4>
    <p class="candidate-address">{address}</p>
    <p class="candidate-meta">&#9733; {rating:.1} &middot; {reviews} reviews</p>
    <p class="candidate-description">{description}</p>
  </div>
  <span class="audit-cta">Audit &rsaquo;</span>
</div>"#,
            id = escape_html(&candidate.id),
            name = escape_html(&candidate.name),
            address = escape_html(&candidate.address),
            rating = candidate.rating,
            reviews = candidate.review_count,
            description = escape_html(&candidate.description),
        );
    }
    html.push_str("</section>");
    html
}

fn render_progress(label: &str) -> String {
    format!(
        r#"<div class="progress"><div class="spinner"></div><h3 id="progress-label">{}</h3></div>"#,
        escape_html(label)
    )
}

fn render_report(result: &AuditResult) -> String {
    let sentiment = &result.sentiment_breakdown;
    format!(
        r#"<section class="report">
  <button type="button" class="link-button" id="start-new-audit">&larr; Start new audit</button>
  <h3 class="report-name">{name}</h3>
  <p class="report-address">{address}</p>
  <div class="gauges">
    {real_gauge}
    <div class="gauge-divider"></div>
    {confidence_gauge}
  </div>
  <div class="sentiment">
    <h4 class="section-title">Review Sentiment Feedback</h4>
    <div class="sentiment-row">
      <div class="sentiment-cell positive"><span class="sentiment-value">{positive}%</span><span class="sentiment-label">Positive</span></div>
      <div class="sentiment-cell neutral"><span class="sentiment-value">{neutral}%</span><span class="sentiment-label">Neutral</span></div>
      <div class="sentiment-cell negative"><span class="sentiment-value">{negative}%</span><span class="sentiment-label">Negative</span></div>
    </div>
  </div>
  <p class="summary">The engine identifies that <strong>{real}%</strong> of this business's feedback follows natural human patterns. The sentiment analysis highlights a predominantly <strong>{reception}</strong> customer reception.</p>
</section>"#,
        name = escape_html(&result.business_name),
        address = escape_html(&result.address),
        real_gauge = render_gauge(
            result.real_percentage,
            "Real Reviews",
            authenticity_color(result.real_percentage)
        ),
        confidence_gauge = render_gauge(result.confidence_score, "AI Confidence", CONFIDENCE_COLOR),
        positive = sentiment.positive.round() as i64,
        neutral = sentiment.neutral.round() as i64,
        negative = sentiment.negative.round() as i64,
        real = display_percentage(result.real_percentage),
        reception = reception_word(sentiment),
    )
}
