use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a line is stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

/// One named series on a chart.
///
/// The core generates these; front-ends just render them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartLine {
    /// Legend name (e.g., "100% BTC", "7-period EMA")
    pub name: String,

    /// CSS-style color ("#FF9900", "black", ...)
    pub color: String,

    /// Stroke width in pixels
    pub width: u32,

    pub style: LineStyle,

    pub points: Vec<(DateTime<Utc>, f64)>,
}

/// A complete chart description: titles, axis labels, optional fixed
/// y-range and the lines to draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,

    /// Fixed y-axis range; `None` lets the renderer fit the data.
    pub y_range: Option<(f64, f64)>,

    /// Suggested height in pixels
    pub height: u32,

    pub lines: Vec<ChartLine>,
}

impl Chart {
    /// Y-range to draw: the fixed range if set, otherwise the data extent.
    pub fn effective_y_range(&self) -> Option<(f64, f64)> {
        if self.y_range.is_some() {
            return self.y_range;
        }
        let (min, max) = self
            .lines
            .iter()
            .flat_map(|l| l.points.iter().map(|(_, v)| *v))
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if !min.is_finite() || !max.is_finite() {
            return None;
        }
        if min == max {
            let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.01 };
            return Some((min - pad, max + pad));
        }
        Some((min, max))
    }

    /// Time extent across all lines.
    pub fn x_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut stamps = self.lines.iter().flat_map(|l| l.points.iter().map(|(t, _)| *t));
        let first = stamps.next()?;
        Some(stamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }
}

/// The three charts shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSet {
    /// Combined normalized portfolio (A, B, 50/50 mix)
    pub portfolio: Chart,

    /// Asset A price with its EMA trend
    pub asset_a: Chart,

    /// Asset B price with its EMA trend
    pub asset_b: Chart,
}
