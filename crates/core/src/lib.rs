pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, NaiveDate, Utc};
use models::{
    log::LogRow, price::PriceSeries, report::TrackerReport, settings::TrackerConfig,
    snapshot::ViewMode,
};
use providers::{binance::BinanceProvider, traits::KlineProvider};
use services::{
    alignment_service::AlignmentService, analytics_service::AnalyticsService,
    chart_service::ChartService, price_service::PriceService, trend_service::TrendService,
};
use std::time::Duration;
use storage::{log_store::LogStore, snapshot_store::SnapshotStore};

use errors::CoreError;

/// Main entry point for the crypto tracker core library.
///
/// Holds the immutable configuration and the services one pipeline run
/// needs. Front-ends (HTTP dashboard, CLI, scheduled jobs) call [`run`]
/// once per page load or invocation; nothing is cached between runs.
///
/// [`run`]: CryptoTracker::run
#[must_use]
pub struct CryptoTracker {
    config: TrackerConfig,
    price_service: PriceService,
    snapshot_store: SnapshotStore,
    log_store: LogStore,
}

impl std::fmt::Debug for CryptoTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoTracker")
            .field("asset_a", &self.config.asset_a.symbol)
            .field("asset_b", &self.config.asset_b.symbol)
            .field("window_days", &self.config.window_days)
            .field("provider", &self.price_service.provider_name())
            .field("raw_data_dir", &self.snapshot_store.root())
            .field("data_dir", &self.log_store.dir())
            .finish()
    }
}

impl CryptoTracker {
    /// Build a tracker that fetches from Binance at `config.api_base_url`.
    pub fn new(config: TrackerConfig) -> Result<Self, CoreError> {
        let provider = BinanceProvider::with_base_url(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        );
        Self::with_provider(config, Box::new(provider))
    }

    /// Build a tracker around any kline provider.
    pub fn with_provider(
        config: TrackerConfig,
        provider: Box<dyn KlineProvider>,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        let price_service = PriceService::new(provider, config.interval.clone()).with_retry(
            config.fetch_attempts,
            Duration::from_millis(config.retry_delay_ms),
        );
        let snapshot_store = SnapshotStore::new(config.raw_data_dir.clone());
        let log_store = LogStore::new(
            config.data_dir.clone(),
            &config.asset_a.label,
            &config.asset_b.label,
        );

        Ok(Self {
            config,
            price_service,
            snapshot_store,
            log_store,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    // ── Pipeline ────────────────────────────────────────────────────

    /// Run the full pipeline now. See [`run_at`](Self::run_at).
    pub async fn run(&self, mode: ViewMode) -> Result<TrackerReport, CoreError> {
        self.run_at(mode, Utc::now()).await
    }

    /// Run the full pipeline as of `now`:
    ///
    /// 1. Acquire both series: fetch live (then freeze them as today's
    ///    snapshots) or load the snapshots of the chosen date
    /// 2. Align, normalize and blend
    /// 3. EMA trend lines for both raw price columns
    /// 4. Summary metrics, leading signal and chart data
    /// 5. Append one row to today's log (always today, even when frozen)
    ///
    /// Any failure aborts the run before the log row is written.
    pub async fn run_at(
        &self,
        mode: ViewMode,
        now: DateTime<Utc>,
    ) -> Result<TrackerReport, CoreError> {
        let today = now.date_naive();
        tracing::info!(%mode, %today, "pipeline run started");

        let (series_a, series_b) = self.acquire(mode, now).await?;

        let frame = AlignmentService::align(&series_a, &series_b)?;
        let portfolio = AlignmentService::normalize(&frame)?;

        let span = self.config.ema_span;
        let trend_a =
            TrendService::trend_line(&series_a.symbol, frame.index(), frame.column_a(), span)?;
        let trend_b =
            TrendService::trend_line(&series_b.symbol, frame.index(), frame.column_b(), span)?;

        let summary = AnalyticsService::summarize(&portfolio)?;
        let signal = AnalyticsService::signal(&summary);

        let charts = ChartService::build(
            &self.config.asset_a,
            &self.config.asset_b,
            self.config.window_days,
            &frame,
            &portfolio,
            &trend_a,
            &trend_b,
        );

        let (_, last_a, last_b) = frame.last_row();
        let log_row = LogRow::new(now, last_a, last_b, &summary);
        let log_path = self.log_store.append(&log_row, today)?;

        tracing::info!(
            %mode,
            rows = frame.len(),
            leader = signal.leader_label(&self.config.asset_a.label, &self.config.asset_b.label),
            ratio = summary.ratio,
            "pipeline run finished"
        );

        Ok(TrackerReport {
            mode,
            frame,
            portfolio,
            trend_a,
            trend_b,
            charts,
            summary,
            signal,
            log_row,
            log_path,
        })
    }

    async fn acquire(
        &self,
        mode: ViewMode,
        now: DateTime<Utc>,
    ) -> Result<(PriceSeries, PriceSeries), CoreError> {
        let asset_a = &self.config.asset_a;
        let asset_b = &self.config.asset_b;

        match mode {
            ViewMode::Live => {
                let window = self.config.window_days;
                let series_a = self.price_service.fetch_window(asset_a, window, now).await?;
                let series_b = self.price_service.fetch_window(asset_b, window, now).await?;

                let today = now.date_naive();
                self.snapshot_store.save_all(&[&series_a, &series_b], today)?;
                Ok((series_a, series_b))
            }
            ViewMode::Frozen(date) => {
                tracing::info!(%date, "loading frozen snapshots");
                let series_a = self.snapshot_store.load(&asset_a.symbol, date)?;
                let series_b = self.snapshot_store.load(&asset_b.symbol, date)?;
                Ok((series_a, series_b))
            }
        }
    }

    // ── Snapshots ───────────────────────────────────────────────────

    /// Dates that can be replayed in frozen mode, newest first.
    pub fn available_snapshot_dates(&self) -> Result<Vec<NaiveDate>, CoreError> {
        self.snapshot_store.available_dates()
    }

    // ── Logs ────────────────────────────────────────────────────────

    /// Raw bytes of the summary log for `date`, if one exists.
    pub fn log_bytes(&self, date: NaiveDate) -> Result<Option<Vec<u8>>, CoreError> {
        self.log_store.read_bytes(date)
    }

    /// Download name for the summary log of `date`.
    #[must_use]
    pub fn log_file_name(&self, date: NaiveDate) -> String {
        LogStore::file_name(date)
    }
}
