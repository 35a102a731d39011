use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analytics::SummaryMetrics;

/// One observation appended to the daily summary log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogRow {
    /// Wall-clock time of the run (not the kline time)
    pub timestamp: DateTime<Utc>,
    pub a_price: f64,
    pub b_price: f64,
    pub a_normalized: f64,
    pub b_normalized: f64,
    pub mix: f64,
    pub ratio: f64,
    pub a_return_pct: f64,
    pub b_return_pct: f64,
    pub diff_pct: f64,
}

impl LogRow {
    pub fn new(timestamp: DateTime<Utc>, a_price: f64, b_price: f64, summary: &SummaryMetrics) -> Self {
        Self {
            timestamp,
            a_price,
            b_price,
            a_normalized: summary.a_normalized,
            b_normalized: summary.b_normalized,
            mix: summary.mix,
            ratio: summary.ratio,
            a_return_pct: summary.a_return_pct,
            b_return_pct: summary.b_return_pct,
            diff_pct: summary.diff_pct,
        }
    }

    /// Column names for a log file, labelled with the two asset labels.
    pub fn columns(a_label: &str, b_label: &str) -> [String; 10] {
        [
            "timestamp_utc".to_string(),
            format!("{a_label}_Price"),
            format!("{b_label}_Price"),
            format!("{a_label}_Normalized"),
            format!("{b_label}_Normalized"),
            "Mix_50_50".to_string(),
            format!("{b_label}_{a_label}_Ratio"),
            format!("{a_label}_Return_%"),
            format!("{b_label}_Return_%"),
            "Difference_%".to_string(),
        ]
    }
}
