use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::price::PriceSeries;
use crate::providers::traits::KlineProvider;

/// Fetches the trailing price window for an asset.
///
/// Fetch policy:
/// - **Bounded retry**: up to `attempts` calls to the provider, `retry_delay`
///   apart. Anything the provider reports (HTTP status, transport error,
///   bad payload) counts as a failed attempt.
/// - **Fail fast after that**: the last error is returned unchanged and the
///   caller aborts the run. There is no fallback to cached data.
pub struct PriceService {
    provider: Box<dyn KlineProvider>,
    interval: String,
    attempts: u32,
    retry_delay: Duration,
}

impl PriceService {
    pub fn new(provider: Box<dyn KlineProvider>, interval: impl Into<String>) -> Self {
        Self {
            provider,
            interval: interval.into(),
            attempts: 1,
            retry_delay: Duration::ZERO,
        }
    }

    /// Allow `attempts` tries per fetch (minimum 1), pausing `retry_delay` in between.
    pub fn with_retry(mut self, attempts: u32, retry_delay: Duration) -> Self {
        self.attempts = attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Hourly closes for `asset` over `[now - window_days, now]`.
    pub async fn fetch_window(
        &self,
        asset: &Asset,
        window_days: u32,
        now: DateTime<Utc>,
    ) -> Result<PriceSeries, CoreError> {
        validate_symbol(&asset.symbol)?;
        if window_days == 0 {
            return Err(CoreError::ValidationError(
                "window must be a positive number of days".into(),
            ));
        }

        let start = ChronoDuration::try_days(i64::from(window_days))
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| {
                CoreError::ValidationError(format!(
                    "window of {window_days} days reaches before the earliest representable date"
                ))
            })?;
        let mut last_error = None;

        for attempt in 1..=self.attempts {
            match self
                .provider
                .fetch_closes(&asset.symbol, &self.interval, start, now)
                .await
            {
                Ok(series) => {
                    tracing::info!(
                        symbol = %asset.symbol,
                        provider = self.provider.name(),
                        points = series.len(),
                        "fetched price window"
                    );
                    return Ok(series);
                }
                Err(e) => {
                    tracing::warn!(
                        symbol = %asset.symbol,
                        attempt,
                        attempts = self.attempts,
                        error = %e,
                        "price fetch failed"
                    );
                    last_error = Some(e);
                    if attempt < self.attempts && !self.retry_delay.is_zero() {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::PriceNotAvailable {
            symbol: asset.symbol.clone(),
            from: start.to_rfc3339(),
            to: now.to_rfc3339(),
        }))
    }
}

/// Exchange symbols are non-empty runs of ASCII letters and digits.
fn validate_symbol(symbol: &str) -> Result<(), CoreError> {
    if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CoreError::ValidationError(format!(
            "invalid exchange symbol: {symbol:?}"
        )));
    }
    Ok(())
}
