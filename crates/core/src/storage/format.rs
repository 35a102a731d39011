use chrono::{DateTime, NaiveDateTime, Utc};
use std::io::{Read, Write};

use crate::errors::CoreError;
use crate::models::log::LogRow;
use crate::models::price::{PricePoint, PriceSeries};

/// Timestamp layout used in every CSV the tracker writes (UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header record of a snapshot file.
pub const SNAPSHOT_HEADER: [&str; 2] = ["timestamp", "price"];

/// Write a price series as a two-column snapshot CSV.
///
/// Prices use Rust's shortest round-trip float formatting, so reading the
/// file back yields bit-identical values.
///
/// ```text
/// timestamp,price
/// 2025-01-15 00:00:00,42000.5
/// 2025-01-15 01:00:00,42110.01
/// ```
pub fn write_snapshot<W: Write>(writer: W, series: &PriceSeries) -> Result<(), CoreError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(SNAPSHOT_HEADER)?;
    for point in series.points() {
        wtr.write_record([
            point.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            point.price.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Parse a snapshot CSV written by [`write_snapshot`].
///
/// `source` names the file in error messages. Blank lines are skipped;
/// anything else that is not `timestamp,price` is an error.
pub fn read_snapshot<R: Read>(
    symbol: &str,
    source: &str,
    reader: R,
) -> Result<PriceSeries, CoreError> {
    let invalid = |message: String| CoreError::InvalidSnapshot {
        path: source.to_string(),
        message,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = rdr.headers().map_err(|e| invalid(e.to_string()))?.clone();
    if header.is_empty() {
        return Err(invalid("file is empty".into()));
    }
    if header.iter().ne(SNAPSHOT_HEADER) {
        let found: Vec<&str> = header.iter().collect();
        return Err(invalid(format!("unexpected header {found:?}")));
    }

    let mut points = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| invalid(e.to_string()))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map_or(0, |p| p.line());
        if record.len() != 2 {
            return Err(invalid(format!(
                "line {line}: expected 2 columns, found {}",
                record.len()
            )));
        }

        let (ts, price) = (&record[0], &record[1]);
        let timestamp = parse_timestamp(ts)
            .ok_or_else(|| invalid(format!("line {line}: bad timestamp {ts:?}")))?;
        let price: f64 = price
            .parse()
            .map_err(|e| invalid(format!("line {line}: bad price {price:?}: {e}")))?;
        points.push(PricePoint::new(timestamp, price));
    }

    Ok(PriceSeries::new(symbol, points))
}

/// Accepts the tracker's own layout and RFC 3339.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        })
}

/// Write one log record, preceded by `header` when the file is new.
///
/// Labels are quoted as needed, so a label containing a comma still yields
/// exactly ten columns.
pub fn write_log_record<W: Write>(
    writer: W,
    header: Option<&[String]>,
    row: &LogRow,
) -> Result<(), CoreError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    if let Some(header) = header {
        wtr.write_record(header)?;
    }
    wtr.write_record(log_fields(row))?;
    wtr.flush()?;
    Ok(())
}

fn log_fields(row: &LogRow) -> [String; 10] {
    [
        row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        row.a_price.to_string(),
        row.b_price.to_string(),
        row.a_normalized.to_string(),
        row.b_normalized.to_string(),
        row.mix.to_string(),
        row.ratio.to_string(),
        row.a_return_pct.to_string(),
        row.b_return_pct.to_string(),
        row.diff_pct.to_string(),
    ]
}
