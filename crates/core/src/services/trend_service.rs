use chrono::{DateTime, Utc};

use crate::errors::CoreError;
use crate::models::trend::TrendLine;

/// Exponential Moving Average, incremental form.
///
/// Matches pandas `ewm(span=span, adjust=False).mean()`:
///   bar 0  → value = price
///   bar 1+ → value = α·price + (1−α)·prev   where α = 2/(span+1)
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    value: Option<f64>,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self {
            alpha: 2.0 / (span as f64 + 1.0),
            value: None,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Feed one price, return the current EMA value.
    pub fn update(&mut self, price: f64) -> f64 {
        let next = match self.value {
            None => price,
            Some(prev) => self.alpha * price + (1.0 - self.alpha) * prev,
        };
        self.value = Some(next);
        next
    }
}

/// Builds EMA trend lines over aligned price columns.
pub struct TrendService;

impl TrendService {
    /// EMA of `values`, same length as the input.
    pub fn ema(values: &[f64], span: usize) -> Result<Vec<f64>, CoreError> {
        if span == 0 {
            return Err(CoreError::ValidationError("EMA span must be at least 1".into()));
        }
        let mut ema = Ema::new(span);
        Ok(values.iter().map(|&v| ema.update(v)).collect())
    }

    /// Trend line for one column of an aligned frame.
    pub fn trend_line(
        symbol: &str,
        index: &[DateTime<Utc>],
        prices: &[f64],
        span: usize,
    ) -> Result<TrendLine, CoreError> {
        if index.len() != prices.len() {
            return Err(CoreError::ValidationError(format!(
                "{symbol}: index has {} rows but prices has {}",
                index.len(),
                prices.len()
            )));
        }
        Ok(TrendLine {
            symbol: symbol.to_string(),
            span,
            index: index.to_vec(),
            values: Self::ema(prices, span)?,
        })
    }
}
