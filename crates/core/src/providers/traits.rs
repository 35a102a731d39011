use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::CoreError;
use crate::models::price::PriceSeries;

/// Source of historical close prices.
///
/// The Binance kline client implements this in production; tests plug in
/// canned or failing providers. Swapping exchanges means writing one new
/// implementation, nothing else changes.
#[async_trait]
pub trait KlineProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Close prices for `symbol` at `interval` granularity with open times
    /// in `[start, end]`, sorted by time.
    async fn fetch_closes(
        &self,
        symbol: &str,
        interval: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries, CoreError>;
}
