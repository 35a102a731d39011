use chrono::NaiveDate;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::log::LogRow;

use super::format;

/// Append-only daily summary logs: `<dir>/crypto_tracker_<YYYY-MM-DD>.csv`.
///
/// The header is written once, by whichever append creates the file.
/// Every later append adds exactly one row; rows are never deduplicated.
#[derive(Debug, Clone)]
pub struct LogStore {
    dir: PathBuf,
    columns: [String; 10],
}

impl LogStore {
    pub fn new(dir: impl Into<PathBuf>, a_label: &str, b_label: &str) -> Self {
        Self {
            dir: dir.into(),
            columns: LogRow::columns(a_label, b_label),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Header fields written at the top of every log file.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Download name for the log of `date`.
    pub fn file_name(date: NaiveDate) -> String {
        format!("crypto_tracker_{}.csv", date.format("%Y-%m-%d"))
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(Self::file_name(date))
    }

    /// Append `row` to the log for `date`, creating the file with a header
    /// if it does not exist yet.
    pub fn append(&self, row: &LogRow, date: NaiveDate) -> Result<PathBuf, CoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(date);

        // create_new decides header-or-not atomically with file creation.
        let (mut file, is_new) = match OpenOptions::new().append(true).create_new(true).open(&path) {
            Ok(file) => (file, true),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                (OpenOptions::new().append(true).open(&path)?, false)
            }
            Err(e) => return Err(e.into()),
        };

        // One write per append, header included.
        let mut chunk = Vec::new();
        let header = is_new.then_some(&self.columns[..]);
        format::write_log_record(&mut chunk, header, row)?;
        file.write_all(&chunk)?;

        tracing::debug!(path = %path.display(), new_file = is_new, "log row appended");
        Ok(path)
    }

    /// Raw bytes of the log for `date`, or `None` if nothing was logged that day.
    pub fn read_bytes(&self, date: NaiveDate) -> Result<Option<Vec<u8>>, CoreError> {
        match std::fs::read(self.path_for(date)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
