//! Circular percentage gauge
//!
//! Rendered as an inline SVG ring: radius 38 in a 100×100 view box with an
//! 8px stroke. The filled arc length is proportional to the clamped value.

pub const GAUGE_RADIUS: f64 = 38.0;
pub const GAUGE_STROKE_WIDTH: u32 = 8;

pub const HIGH_AUTHENTICITY_COLOR: &str = "#10b981";
pub const MEDIUM_AUTHENTICITY_COLOR: &str = "#f59e0b";
pub const LOW_AUTHENTICITY_COLOR: &str = "#ef4444";
pub const CONFIDENCE_COLOR: &str = "#3b82f6";

/// Clamp into [0, 100]; non-finite values read as 0
pub fn clamp_percentage(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Rounded clamped value for display
pub fn display_percentage(value: f64) -> i64 {
    clamp_percentage(value).round() as i64
}

pub fn circumference() -> f64 {
    2.0 * std::f64::consts::PI * GAUGE_RADIUS
}

/// Unfilled arc length: `C - (v/100)·C`
pub fn dash_offset(value: f64) -> f64 {
    let c = circumference();
    c - (clamp_percentage(value) / 100.0) * c
}

/// Color of the "Real Reviews" gauge
pub fn authenticity_color(real_percentage: f64) -> &'static str {
    if real_percentage > 80.0 {
        HIGH_AUTHENTICITY_COLOR
    } else if real_percentage > 50.0 {
        MEDIUM_AUTHENTICITY_COLOR
    } else {
        LOW_AUTHENTICITY_COLOR
    }
}

/// Gauge markup: ring, centered percentage and a caption below
pub fn render_gauge(value: f64, label: &str, color: &str) -> String {
    format!(
        r#"<div class="gauge">
  <div class="gauge-ring">
    <svg viewBox="0 0 100 100" class="gauge-svg">
      <circle class="gauge-track" stroke-width="{stroke}" fill="transparent" r="{r}" cx="50" cy="50"/>
      <circle class="gauge-value" style="stroke-dasharray: {c:.3}; stroke-dashoffset: {offset:.3};" stroke-width="{stroke}" stroke-linecap="round" stroke="{color}" fill="transparent" r="{r}" cx="50" cy="50"/>
    </svg>
    <span class="gauge-number">{shown}%</span>
  </div>
  <span class="gauge-label">{label}</span>
</div>"#,
        stroke = GAUGE_STROKE_WIDTH,
        r = GAUGE_RADIUS,
        c = circumference(),
        offset = dash_offset(value),
        color = color,
        shown = display_percentage(value),
        label = super::page::escape_html(label),
    )
}
