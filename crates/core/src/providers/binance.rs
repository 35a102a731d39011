use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::price::{PricePoint, PriceSeries};
use super::traits::KlineProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Maximum rows Binance returns per kline request.
const PAGE_LIMIT: usize = 1000;

/// Binance spot REST provider for hourly close prices.
///
/// - **Free**: No API key required for market data.
/// - **Endpoint**: `/api/v3/klines?symbol=..&interval=..&startTime=..&endTime=..`
/// - **Shape**: a JSON array of fixed-position arrays
///   `[open_time, open, high, low, close, volume, close_time, ...]`.
///   Only `open_time` (index 0) and `close` (index 4) are consumed.
///
/// Windows longer than one page (1000 klines) are fetched page by page.
pub struct BinanceProvider {
    client: Client,
    base_url: String,
}

impl BinanceProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, Duration::from_secs(30))
    }

    /// Point the provider at another host (a mirror, or a mock server in tests).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_page(
        &self,
        symbol: &str,
        interval: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let url = format!(
            "{}/api/v3/klines?symbol={symbol}&interval={interval}&startTime={start_ms}&endTime={end_ms}&limit={PAGE_LIMIT}",
            self.base_url
        );
        tracing::debug!(%symbol, %interval, start_ms, end_ms, "requesting klines");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(200).collect();
            return Err(CoreError::Api {
                provider: "Binance".into(),
                message: format!("HTTP {status} for {symbol}: {excerpt}"),
            });
        }

        let body = resp.text().await?;
        parse_klines(symbol, &body)
    }
}

impl Default for BinanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a kline response body into (open time, close) points.
///
/// Anything other than an array of arrays with an integer open time and a
/// numeric close (Binance sends it as a decimal string) is a
/// `Deserialization` error. Non-finite or non-positive closes are rejected
/// as an `Api` error.
pub fn parse_klines(symbol: &str, body: &str) -> Result<Vec<PricePoint>, CoreError> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body).map_err(|e| {
        CoreError::Deserialization(format!("Unexpected kline payload for {symbol}: {e}"))
    })?;

    let mut points = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let open_time = row.first().and_then(Value::as_i64).ok_or_else(|| {
            CoreError::Deserialization(format!("Kline row {i} for {symbol} has no open time"))
        })?;
        let close = row.get(4).and_then(value_as_f64).ok_or_else(|| {
            CoreError::Deserialization(format!("Kline row {i} for {symbol} has no close price"))
        })?;
        if !close.is_finite() || close <= 0.0 {
            return Err(CoreError::Api {
                provider: "Binance".into(),
                message: format!("Invalid close price for {symbol} in row {i}: {close}"),
            });
        }
        let timestamp = DateTime::from_timestamp_millis(open_time).ok_or_else(|| {
            CoreError::Deserialization(format!(
                "Kline row {i} for {symbol} has out-of-range open time {open_time}"
            ))
        })?;
        points.push(PricePoint::new(timestamp, close));
    }
    Ok(points)
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

#[async_trait]
impl KlineProvider for BinanceProvider {
    fn name(&self) -> &str {
        "Binance"
    }

    async fn fetch_closes(
        &self,
        symbol: &str,
        interval: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries, CoreError> {
        let end_ms = end.timestamp_millis();
        let mut start_ms = start.timestamp_millis();
        let mut points = Vec::new();

        loop {
            let page = self.fetch_page(symbol, interval, start_ms, end_ms).await?;
            let page_len = page.len();
            let last_open = page.last().map(|p| p.timestamp.timestamp_millis());
            points.extend(page);

            match last_open {
                Some(last) if page_len >= PAGE_LIMIT && last < end_ms => start_ms = last + 1,
                _ => break,
            }
        }

        if points.is_empty() {
            return Err(CoreError::PriceNotAvailable {
                symbol: symbol.to_string(),
                from: start.to_rfc3339(),
                to: end.to_rfc3339(),
            });
        }

        tracing::debug!(%symbol, rows = points.len(), "klines received");
        Ok(PriceSeries::new(symbol, points))
    }
}
