use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Two price columns joined on a shared, gap-free timestamp index.
///
/// Column `a` belongs to asset A (BTC by default), column `b` to asset B.
/// Every index entry has a value in both columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedFrame {
    index: Vec<DateTime<Utc>>,
    a: Vec<f64>,
    b: Vec<f64>,
}

impl AlignedFrame {
    /// Build a frame from already-filled columns.
    /// All three vectors must have the same, non-zero length.
    pub fn from_columns(
        index: Vec<DateTime<Utc>>,
        a: Vec<f64>,
        b: Vec<f64>,
    ) -> Result<Self, CoreError> {
        if index.is_empty() {
            return Err(CoreError::InsufficientData(
                "aligned frame has no rows".into(),
            ));
        }
        if a.len() != index.len() || b.len() != index.len() {
            return Err(CoreError::ValidationError(format!(
                "column lengths differ from index: index={}, a={}, b={}",
                index.len(),
                a.len(),
                b.len()
            )));
        }
        Ok(Self { index, a, b })
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    pub fn column_a(&self) -> &[f64] {
        &self.a
    }

    pub fn column_b(&self) -> &[f64] {
        &self.b
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Last row as (timestamp, a, b). Frames are never empty.
    pub fn last_row(&self) -> (DateTime<Utc>, f64, f64) {
        let i = self.index.len() - 1;
        (self.index[i], self.a[i], self.b[i])
    }
}
