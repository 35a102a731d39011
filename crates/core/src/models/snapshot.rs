use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a pipeline run takes its prices from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewMode {
    /// Fetch fresh klines and freeze them as today's snapshot.
    Live,
    /// Replay the snapshots saved on the given date. No network access.
    Frozen(NaiveDate),
}

impl ViewMode {
    pub fn is_live(&self) -> bool {
        matches!(self, ViewMode::Live)
    }

    /// Parse a selector value: "live" (any case, or empty) or a `YYYY-MM-DD` date.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("live") {
            return Some(ViewMode::Live);
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .map(ViewMode::Frozen)
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::Live => write!(f, "live"),
            ViewMode::Frozen(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}
