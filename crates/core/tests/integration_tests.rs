// ═══════════════════════════════════════════════════════════════════
// Integration Tests — CryptoTracker end-to-end (live, frozen, logging)
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use crypto_tracker_core::errors::CoreError;
use crypto_tracker_core::models::analytics::LeadingSignal;
use crypto_tracker_core::models::price::{PricePoint, PriceSeries};
use crypto_tracker_core::models::settings::TrackerConfig;
use crypto_tracker_core::models::snapshot::ViewMode;
use crypto_tracker_core::providers::traits::KlineProvider;
use crypto_tracker_core::CryptoTracker;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 30, 0).unwrap()
}

fn today() -> NaiveDate {
    now().date_naive()
}

/// Serves BTC rising 10% and ETH rising 15% over three hourly bars,
/// with ETH missing the middle bar.
struct ScriptedProvider {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

#[async_trait]
impl KlineProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn fetch_closes(
        &self,
        symbol: &str,
        _interval: &str,
        _start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CoreError::Api {
                provider: "Scripted".into(),
                message: "HTTP 503 Service Unavailable".into(),
            });
        }
        let t = |h: i64| end - Duration::hours(h);
        let points = match symbol {
            "BTCUSDT" => vec![
                PricePoint::new(t(3), 40_000.0),
                PricePoint::new(t(2), 42_000.0),
                PricePoint::new(t(1), 44_000.0),
            ],
            "ETHUSDT" => vec![
                PricePoint::new(t(3), 2_000.0),
                PricePoint::new(t(1), 2_300.0),
            ],
            other => {
                return Err(CoreError::PriceNotAvailable {
                    symbol: other.to_string(),
                    from: String::new(),
                    to: String::new(),
                })
            }
        };
        Ok(PriceSeries::new(symbol, points))
    }
}

struct Harness {
    tracker: CryptoTracker,
    calls: Arc<AtomicUsize>,
    tmp: TempDir,
}

fn harness(fail: bool) -> Harness {
    let tmp = TempDir::new().unwrap();
    let config = TrackerConfig {
        retry_delay_ms: 0,
        ..TrackerConfig::default()
    }
    .with_data_root(tmp.path());
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = ScriptedProvider {
        calls: Arc::clone(&calls),
        fail,
    };
    let tracker = CryptoTracker::with_provider(config, Box::new(provider)).unwrap();
    Harness {
        tracker,
        calls,
        tmp,
    }
}

fn log_lines(h: &Harness) -> Vec<String> {
    match h.tracker.log_bytes(today()).unwrap() {
        Some(bytes) => String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

// ═══════════════════════════════════════════════════════════════════
// Live mode
// ═══════════════════════════════════════════════════════════════════

mod live {
    use super::*;

    #[tokio::test]
    async fn full_pipeline() {
        let h = harness(false);
        let report = h.tracker.run_at(ViewMode::Live, now()).await.unwrap();

        assert_eq!(report.mode, ViewMode::Live);
        assert_eq!(report.frame.len(), 3);
        assert_eq!(report.frame.column_b(), &[2_000.0, 2_000.0, 2_300.0]);

        assert_eq!(report.portfolio.a[0], 1.0);
        assert_eq!(report.portfolio.b[0], 1.0);
        assert!((report.summary.a_normalized - 1.10).abs() < 1e-9);
        assert!((report.summary.b_normalized - 1.15).abs() < 1e-9);
        assert!((report.summary.mix - 1.125).abs() < 1e-9);
        assert_eq!(report.signal, LeadingSignal::BLeading);

        assert_eq!(report.trend_a.values.len(), 3);
        assert_eq!(report.trend_a.values[0], 40_000.0);
        assert_eq!(report.charts.portfolio.lines.len(), 3);

        assert_eq!(report.log_row.timestamp, now());
        assert_eq!(report.log_row.a_price, 44_000.0);
        assert_eq!(report.log_row.b_price, 2_300.0);
    }

    #[tokio::test]
    async fn saves_todays_snapshots() {
        let h = harness(false);
        h.tracker.run_at(ViewMode::Live, now()).await.unwrap();

        let day_dir = h.tmp.path().join("raw_data").join("2025-01-15");
        assert!(day_dir.join("BTCUSDT.csv").is_file());
        assert!(day_dir.join("ETHUSDT.csv").is_file());
        assert_eq!(h.tracker.available_snapshot_dates().unwrap(), vec![today()]);
    }

    #[tokio::test]
    async fn each_run_appends_one_row() {
        let h = harness(false);
        h.tracker.run_at(ViewMode::Live, now()).await.unwrap();
        h.tracker
            .run_at(ViewMode::Live, now() + Duration::minutes(1))
            .await
            .unwrap();

        let lines = log_lines(&h);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("timestamp_utc,BTC_Price,ETH_Price"));
        assert!(lines[1].starts_with("2025-01-15 12:30:00,"));
        assert!(lines[2].starts_with("2025-01-15 12:31:00,"));
    }

    #[tokio::test]
    async fn provider_failure_aborts_without_logging() {
        let h = harness(true);
        let result = h.tracker.run_at(ViewMode::Live, now()).await;

        assert!(matches!(result, Err(CoreError::Api { .. })));
        assert_eq!(h.calls.load(Ordering::SeqCst), 3);
        assert!(log_lines(&h).is_empty());
        assert!(h.tracker.available_snapshot_dates().unwrap().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Frozen mode
// ═══════════════════════════════════════════════════════════════════

mod frozen {
    use super::*;

    #[tokio::test]
    async fn replays_snapshot_without_network() {
        let h = harness(false);
        let live = h.tracker.run_at(ViewMode::Live, now()).await.unwrap();
        let calls_after_live = h.calls.load(Ordering::SeqCst);

        let later = now() + Duration::days(2);
        let frozen = h
            .tracker
            .run_at(ViewMode::Frozen(today()), later)
            .await
            .unwrap();

        assert_eq!(h.calls.load(Ordering::SeqCst), calls_after_live);
        assert_eq!(frozen.frame, live.frame);
        assert_eq!(frozen.summary, live.summary);
        assert_eq!(frozen.signal, live.signal);
        assert_eq!(h.tracker.available_snapshot_dates().unwrap(), vec![today()]);
    }

    #[tokio::test]
    async fn logs_to_the_run_day_not_the_snapshot_day() {
        let h = harness(false);
        h.tracker.run_at(ViewMode::Live, now()).await.unwrap();

        let later = now() + Duration::days(2);
        let report = h
            .tracker
            .run_at(ViewMode::Frozen(today()), later)
            .await
            .unwrap();

        assert!(report
            .log_path
            .ends_with(h.tracker.log_file_name(later.date_naive())));
        assert!(h.tracker.log_bytes(later.date_naive()).unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_asset_snapshot_is_not_found() {
        let h = harness(false);
        h.tracker.run_at(ViewMode::Live, now()).await.unwrap();
        std::fs::remove_file(
            h.tmp
                .path()
                .join("raw_data")
                .join("2025-01-15")
                .join("ETHUSDT.csv"),
        )
        .unwrap();
        let rows_before = log_lines(&h).len();

        let result = h.tracker.run_at(ViewMode::Frozen(today()), now()).await;
        match result {
            Err(CoreError::SnapshotNotFound { symbol, .. }) => assert_eq!(symbol, "ETHUSDT"),
            other => panic!("Expected SnapshotNotFound, got {:?}", other),
        }
        assert_eq!(log_lines(&h).len(), rows_before);
    }

    #[tokio::test]
    async fn unknown_date_is_not_found() {
        let h = harness(false);
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let result = h.tracker.run_at(ViewMode::Frozen(date), now()).await;
        assert!(matches!(result, Err(CoreError::SnapshotNotFound { .. })));
        assert_eq!(h.calls.load(Ordering::SeqCst), 0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Construction
// ═══════════════════════════════════════════════════════════════════

mod construction {
    use super::*;

    #[test]
    fn invalid_config_rejected() {
        let config = TrackerConfig {
            window_days: 0,
            ..TrackerConfig::default()
        };
        let provider = ScriptedProvider {
            calls: Arc::new(AtomicUsize::new(0)),
            fail: false,
        };
        let result = CryptoTracker::with_provider(config, Box::new(provider));
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[tokio::test]
    async fn huge_window_from_toml_fails_cleanly() {
        let tmp = TempDir::new().unwrap();
        let config = TrackerConfig::from_toml_str("window_days = 100000000\nretry_delay_ms = 0\n")
            .unwrap()
            .with_data_root(tmp.path());
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = ScriptedProvider {
            calls: Arc::clone(&calls),
            fail: false,
        };
        let tracker = CryptoTracker::with_provider(config, Box::new(provider)).unwrap();

        let result = tracker.run_at(ViewMode::Live, now()).await;
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(tracker.log_bytes(today()).unwrap().is_none());
    }

    #[test]
    fn debug_names_provider() {
        let h = harness(false);
        let dbg = format!("{:?}", h.tracker);
        assert!(dbg.contains("Scripted"));
        assert!(dbg.contains("BTCUSDT"));
    }
}
