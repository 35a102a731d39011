use chrono::NaiveDate;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::price::PriceSeries;

use super::format;

/// Per-day raw price snapshots on disk.
///
/// Layout: `<root>/<YYYY-MM-DD>/<SYMBOL>.csv`. The date is a directory name
/// and the symbol a file stem, so neither has to be split out of a
/// composite filename.
///
/// A live run overwrites the snapshot for today: the last fetch of the day
/// becomes the frozen record for that date.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic location of the snapshot for `(symbol, date)`.
    pub fn path_for(&self, symbol: &str, date: NaiveDate) -> PathBuf {
        self.root
            .join(date.format("%Y-%m-%d").to_string())
            .join(format!("{}.csv", symbol.to_uppercase()))
    }

    /// Write `series` as the snapshot for `date`, replacing any earlier one.
    pub fn save(&self, series: &PriceSeries, date: NaiveDate) -> Result<PathBuf, CoreError> {
        self.save_all(&[series], date)?
            .pop()
            .ok_or_else(|| CoreError::FileIO(format!("snapshot for {} was not written", series.symbol)))
    }

    /// Write several series as the snapshots for `date` as one set.
    ///
    /// Every file is first written next to its target as `<SYMBOL>.csv.tmp`.
    /// Targets are only replaced once all of them were written, so a failed
    /// write leaves the previous set for `date` untouched.
    pub fn save_all(
        &self,
        series: &[&PriceSeries],
        date: NaiveDate,
    ) -> Result<Vec<PathBuf>, CoreError> {
        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(series.len());
        for s in series {
            let path = self.path_for(&s.symbol, date);
            let tmp = path.with_extension("csv.tmp");
            if let Err(e) = write_file(&tmp, s) {
                let _ = std::fs::remove_file(&tmp);
                for (written, _) in &staged {
                    let _ = std::fs::remove_file(written);
                }
                tracing::warn!(symbol = %s.symbol, %date, error = %e, "snapshot set not saved");
                return Err(e);
            }
            staged.push((tmp, path));
        }

        let mut paths = Vec::with_capacity(staged.len());
        for (tmp, path) in staged {
            std::fs::rename(&tmp, &path)?;
            tracing::info!(%date, path = %path.display(), "snapshot saved");
            paths.push(path);
        }
        Ok(paths)
    }

    /// Load the snapshot for `(symbol, date)`.
    pub fn load(&self, symbol: &str, date: NaiveDate) -> Result<PriceSeries, CoreError> {
        let path = self.path_for(symbol, date);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CoreError::SnapshotNotFound {
                    symbol: symbol.to_uppercase(),
                    date: date.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        format::read_snapshot(symbol, &path.display().to_string(), file)
    }

    /// Dates with at least one saved snapshot, newest first.
    ///
    /// Directories whose names are not dates are ignored. A missing root
    /// simply means nothing has been saved yet.
    pub fn available_dates(&self) -> Result<Vec<NaiveDate>, CoreError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut dates = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(date) = entry
                .file_name()
                .to_str()
                .and_then(|name| NaiveDate::parse_from_str(name, "%Y-%m-%d").ok())
            else {
                continue;
            };
            if has_csv(&entry.path())? {
                dates.push(date);
            }
        }

        dates.sort_unstable_by(|a, b| b.cmp(a));
        dates.dedup();
        Ok(dates)
    }
}

fn has_csv(dir: &Path) -> Result<bool, CoreError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            return Ok(true);
        }
    }
    Ok(false)
}

fn write_file(path: &Path, series: &PriceSeries) -> Result<(), CoreError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    format::write_snapshot(File::create(path)?, series)
}
