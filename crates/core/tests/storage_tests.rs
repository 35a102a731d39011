// ═══════════════════════════════════════════════════════════════════
// Storage Tests — Snapshot files, date discovery, daily summary logs
// ═══════════════════════════════════════════════════════════════════

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tempfile::TempDir;

use crypto_tracker_core::errors::CoreError;
use crypto_tracker_core::models::log::LogRow;
use crypto_tracker_core::models::price::{PricePoint, PriceSeries};
use crypto_tracker_core::services::analytics_service::AnalyticsService;
use crypto_tracker_core::storage::format;
use crypto_tracker_core::storage::log_store::LogStore;
use crypto_tracker_core::storage::snapshot_store::SnapshotStore;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════

fn hour(h: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap() + Duration::hours(h)
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

fn btc_series() -> PriceSeries {
    PriceSeries::new(
        "BTCUSDT",
        vec![
            PricePoint::new(hour(0), 42_000.5),
            PricePoint::new(hour(1), 42_110.01),
            PricePoint::new(hour(2), 0.1 + 0.2),
        ],
    )
}

fn sample_row(ts: DateTime<Utc>) -> LogRow {
    let summary = AnalyticsService::from_final_values(1.10, 1.15, 1.125);
    LogRow::new(ts, 44_000.0, 2_300.0, &summary)
}

// ═══════════════════════════════════════════════════════════════════
// Snapshot format
// ═══════════════════════════════════════════════════════════════════

mod snapshot_format {
    use super::*;

    fn read(contents: &str) -> Result<PriceSeries, CoreError> {
        format::read_snapshot("BTCUSDT", "x.csv", contents.as_bytes())
    }

    #[test]
    fn header_and_rows() {
        let mut buf = Vec::new();
        format::write_snapshot(&mut buf, &btc_series()).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("timestamp,price"));
        assert_eq!(lines.next(), Some("2025-01-15 00:00:00,42000.5"));
    }

    #[test]
    fn bad_header_rejected() {
        assert!(matches!(read("time,close\n"), Err(CoreError::InvalidSnapshot { .. })));
    }

    #[test]
    fn empty_file_rejected() {
        assert!(matches!(read(""), Err(CoreError::InvalidSnapshot { .. })));
    }

    #[test]
    fn bad_price_names_line() {
        match read("timestamp,price\n2025-01-15 00:00:00,abc\n") {
            Err(CoreError::InvalidSnapshot { path, message }) => {
                assert_eq!(path, "x.csv");
                assert!(message.contains("line 2"));
            }
            other => panic!("Expected InvalidSnapshot, got {:?}", other),
        }
    }

    #[test]
    fn extra_column_rejected() {
        let result = read("timestamp,price\n2025-01-15 00:00:00,1.0,2.0\n");
        assert!(matches!(result, Err(CoreError::InvalidSnapshot { .. })));
    }

    #[test]
    fn rfc3339_timestamps_accepted() {
        let s = format::read_snapshot(
            "ETHUSDT",
            "x.csv",
            "timestamp,price\n2025-01-15T01:00:00Z,3000\n\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(s.timestamps(), vec![hour(1)]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// SnapshotStore
// ═══════════════════════════════════════════════════════════════════

mod snapshot_store {
    use super::*;

    #[test]
    fn save_then_load_is_exact() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let original = btc_series();

        let path = store.save(&original, date(15)).unwrap();
        assert!(path.ends_with("2025-01-15/BTCUSDT.csv"));

        let loaded = store.load("BTCUSDT", date(15)).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn save_overwrites_same_day() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        store.save(&btc_series(), date(15)).unwrap();

        let newer = PriceSeries::new("BTCUSDT", vec![PricePoint::new(hour(5), 43_000.0)]);
        store.save(&newer, date(15)).unwrap();

        assert_eq!(store.load("BTCUSDT", date(15)).unwrap(), newer);
    }

    #[test]
    fn failed_set_keeps_previous_snapshots() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let eth = PriceSeries::new("ETHUSDT", vec![PricePoint::new(hour(0), 3_000.0)]);
        store.save_all(&[&btc_series(), &eth], date(15)).unwrap();

        // A directory squatting on ETH's staging path makes its write fail.
        let day = tmp.path().join("2025-01-15");
        std::fs::create_dir_all(day.join("ETHUSDT.csv.tmp")).unwrap();

        let newer_btc = PriceSeries::new("BTCUSDT", vec![PricePoint::new(hour(5), 43_000.0)]);
        let newer_eth = PriceSeries::new("ETHUSDT", vec![PricePoint::new(hour(5), 3_100.0)]);
        assert!(store.save_all(&[&newer_btc, &newer_eth], date(15)).is_err());

        assert_eq!(store.load("BTCUSDT", date(15)).unwrap(), btc_series());
        assert_eq!(store.load("ETHUSDT", date(15)).unwrap(), eth);
        assert!(!day.join("BTCUSDT.csv.tmp").exists());
    }

    #[test]
    fn save_all_returns_final_paths() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let eth = PriceSeries::new("ETHUSDT", vec![PricePoint::new(hour(0), 3_000.0)]);
        let paths = store.save_all(&[&btc_series(), &eth], date(15)).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.is_file()));
        assert!(paths[1].ends_with("2025-01-15/ETHUSDT.csv"));
    }

    #[test]
    fn missing_snapshot_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        match store.load("ETHUSDT", date(14)) {
            Err(CoreError::SnapshotNotFound { symbol, date }) => {
                assert_eq!(symbol, "ETHUSDT");
                assert_eq!(date, "2025-01-14");
            }
            other => panic!("Expected SnapshotNotFound, got {:?}", other),
        }
    }

    #[test]
    fn available_dates_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path().join("never_created"));
        assert!(store.available_dates().unwrap().is_empty());
    }

    #[test]
    fn available_dates_newest_first_without_duplicates() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let eth = PriceSeries::new("ETHUSDT", vec![PricePoint::new(hour(0), 3_000.0)]);

        store.save(&btc_series(), date(13)).unwrap();
        store.save(&btc_series(), date(15)).unwrap();
        store.save(&eth, date(15)).unwrap();
        store.save(&eth, date(14)).unwrap();

        assert_eq!(store.available_dates().unwrap(), vec![date(15), date(14), date(13)]);
    }

    #[test]
    fn available_dates_ignores_foreign_entries() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        store.save(&btc_series(), date(15)).unwrap();

        std::fs::create_dir_all(tmp.path().join("not-a-date")).unwrap();
        std::fs::create_dir_all(tmp.path().join("2025-01-10")).unwrap();
        std::fs::write(tmp.path().join("2025-01-11"), "stray file").unwrap();

        assert_eq!(store.available_dates().unwrap(), vec![date(15)]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// LogStore
// ═══════════════════════════════════════════════════════════════════

mod log_store {
    use super::*;

    #[test]
    fn file_name_is_dated() {
        assert_eq!(LogStore::file_name(date(15)), "crypto_tracker_2025-01-15.csv");
    }

    #[test]
    fn two_appends_one_header_two_rows() {
        let tmp = TempDir::new().unwrap();
        let store = LogStore::new(tmp.path().join("logs"), "BTC", "ETH");

        let path = store.append(&sample_row(hour(10)), date(15)).unwrap();
        store.append(&sample_row(hour(11)), date(15)).unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], store.columns().join(","));
        assert!(lines[0].starts_with("timestamp_utc,BTC_Price,ETH_Price"));
        assert!(lines[1].starts_with("2025-01-15 10:00:00,44000,2300,1.1,1.15,1.125,"));
        assert!(lines[2].starts_with("2025-01-15 11:00:00,"));
        assert_eq!(lines[1].split(',').count(), 10);
    }

    #[test]
    fn comma_in_label_keeps_ten_columns() {
        let tmp = TempDir::new().unwrap();
        let store = LogStore::new(tmp.path(), "BTC,A", "ETH");
        let path = store.append(&sample_row(hour(10)), date(15)).unwrap();
        store.append(&sample_row(hour(11)), date(15)).unwrap();

        let mut rdr = csv::Reader::from_path(path).unwrap();
        let header = rdr.headers().unwrap().clone();
        assert_eq!(header.len(), 10);
        assert_eq!(&header[1], "BTC,A_Price");
        assert_eq!(&header[6], "ETH_BTC,A_Ratio");

        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.len() == 10));
    }

    #[test]
    fn separate_days_separate_files() {
        let tmp = TempDir::new().unwrap();
        let store = LogStore::new(tmp.path(), "BTC", "ETH");
        let a = store.append(&sample_row(hour(0)), date(15)).unwrap();
        let b = store.append(&sample_row(hour(24)), date(16)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn read_bytes_none_before_first_append() {
        let tmp = TempDir::new().unwrap();
        let store = LogStore::new(tmp.path(), "BTC", "ETH");
        assert!(store.read_bytes(date(15)).unwrap().is_none());

        store.append(&sample_row(hour(0)), date(15)).unwrap();
        let bytes = store.read_bytes(date(15)).unwrap().unwrap();
        assert!(bytes.starts_with(b"timestamp_utc,"));
    }
}
