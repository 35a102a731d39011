use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// EMA-smoothed version of one asset's raw price column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub symbol: String,
    pub span: usize,
    pub index: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
}
