use std::path::PathBuf;

use serde::Serialize;

use super::analytics::{LeadingSignal, SummaryMetrics};
use super::chart::ChartSet;
use super::frame::AlignedFrame;
use super::log::LogRow;
use super::portfolio::NormalizedPortfolio;
use super::snapshot::ViewMode;
use super::trend::TrendLine;

/// Everything a single pipeline run produces, ready for a front-end.
#[derive(Debug, Clone, Serialize)]
pub struct TrackerReport {
    pub mode: ViewMode,
    pub frame: AlignedFrame,
    pub portfolio: NormalizedPortfolio,
    pub trend_a: TrendLine,
    pub trend_b: TrendLine,
    pub charts: ChartSet,
    pub summary: SummaryMetrics,
    pub signal: LeadingSignal,
    pub log_row: LogRow,
    pub log_path: PathBuf,
}
