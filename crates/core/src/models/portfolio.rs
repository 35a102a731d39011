use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Relative performance of both assets over the frame index.
///
/// `a` and `b` are each asset's price divided by its first aligned price,
/// so both start at exactly 1.0. `mix` is the equal-weight blend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPortfolio {
    pub index: Vec<DateTime<Utc>>,
    pub a: Vec<f64>,
    pub b: Vec<f64>,
    pub mix: Vec<f64>,
}

/// Final row of a [`NormalizedPortfolio`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRow {
    pub timestamp: DateTime<Utc>,
    pub a: f64,
    pub b: f64,
    pub mix: f64,
}

impl NormalizedPortfolio {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn last_row(&self) -> Option<PortfolioRow> {
        let i = self.index.len().checked_sub(1)?;
        Some(PortfolioRow {
            timestamp: self.index[i],
            a: self.a[i],
            b: self.b[i],
            mix: self.mix[i],
        })
    }

    /// Y-axis range for the combined chart: the extremes of all three
    /// series padded by 0.5% on each side.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        let values = self.a.iter().chain(&self.b).chain(&self.mix).copied();
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !min.is_finite() || !max.is_finite() {
            return None;
        }
        Some((min * 0.995, max * 1.005))
    }
}
