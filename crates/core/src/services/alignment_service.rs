use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::models::frame::AlignedFrame;
use crate::models::portfolio::NormalizedPortfolio;
use crate::models::price::PriceSeries;

/// Weight of each asset in the blended portfolio.
pub const MIX_WEIGHT: f64 = 0.5;

/// Joins the two raw series and derives the normalized portfolio.
pub struct AlignmentService;

impl AlignmentService {
    /// Outer-join `a` and `b` on timestamp, then fill each column forward
    /// and finally backward, so every row of the union index has both prices.
    ///
    /// Fails with `InsufficientData` when either series is empty: a column
    /// with no observations cannot be filled.
    pub fn align(a: &PriceSeries, b: &PriceSeries) -> Result<AlignedFrame, CoreError> {
        if a.is_empty() || b.is_empty() {
            return Err(CoreError::InsufficientData(format!(
                "cannot align {} ({} points) with {} ({} points)",
                a.symbol,
                a.len(),
                b.symbol,
                b.len()
            )));
        }

        let mut joined: BTreeMap<DateTime<Utc>, (Option<f64>, Option<f64>)> = BTreeMap::new();
        for p in a.points() {
            joined.entry(p.timestamp).or_default().0 = Some(p.price);
        }
        for p in b.points() {
            joined.entry(p.timestamp).or_default().1 = Some(p.price);
        }

        let index: Vec<DateTime<Utc>> = joined.keys().copied().collect();
        let (col_a, col_b): (Vec<Option<f64>>, Vec<Option<f64>>) = joined.into_values().unzip();

        let col_a = fill_column(col_a, &a.symbol)?;
        let col_b = fill_column(col_b, &b.symbol)?;

        AlignedFrame::from_columns(index, col_a, col_b)
    }

    /// Divide each column by its first value and blend them 50/50.
    pub fn normalize(frame: &AlignedFrame) -> Result<NormalizedPortfolio, CoreError> {
        let a = normalize_column(frame.column_a(), "asset A")?;
        let b = normalize_column(frame.column_b(), "asset B")?;
        let mix = a
            .iter()
            .zip(&b)
            .map(|(x, y)| MIX_WEIGHT * x + MIX_WEIGHT * y)
            .collect();

        Ok(NormalizedPortfolio {
            index: frame.index().to_vec(),
            a,
            b,
            mix,
        })
    }
}

/// Forward-fill, then backward-fill. Errors if nothing was observed at all.
fn fill_column(mut column: Vec<Option<f64>>, symbol: &str) -> Result<Vec<f64>, CoreError> {
    let mut carry = None;
    for slot in column.iter_mut() {
        match slot {
            Some(v) => carry = Some(*v),
            None => *slot = carry,
        }
    }

    let mut carry = None;
    for slot in column.iter_mut().rev() {
        match slot {
            Some(v) => carry = Some(*v),
            None => *slot = carry,
        }
    }

    column
        .into_iter()
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| CoreError::InsufficientData(format!("{symbol} has no observations")))
}

fn normalize_column(column: &[f64], what: &str) -> Result<Vec<f64>, CoreError> {
    let base = *column
        .first()
        .ok_or_else(|| CoreError::InsufficientData(format!("{what} column is empty")))?;
    if !base.is_finite() || base <= 0.0 {
        return Err(CoreError::InsufficientData(format!(
            "{what} starts at {base}, cannot normalize"
        )));
    }
    Ok(column.iter().map(|v| v / base).collect())
}
