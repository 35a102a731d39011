use serde::{Deserialize, Serialize};

/// Headline numbers computed from the final portfolio row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    /// Asset A normalized value at the latest timestamp (base = 1.0)
    pub a_normalized: f64,

    /// Asset B normalized value at the latest timestamp (base = 1.0)
    pub b_normalized: f64,

    /// 50/50 mix value at the latest timestamp
    pub mix: f64,

    /// Percentage return of asset A since window start: (a_normalized - 1) * 100
    pub a_return_pct: f64,

    /// Percentage return of asset B since window start
    pub b_return_pct: f64,

    /// b_normalized / a_normalized (the ETH/BTC ratio for the default pair)
    pub ratio: f64,

    /// b_return_pct - a_return_pct
    pub diff_pct: f64,
}

/// Which asset has performed better over the window.
///
/// Ties go to asset A: B only leads on a strictly greater normalized value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadingSignal {
    ALeading,
    BLeading,
}

impl LeadingSignal {
    pub fn from_values(a_normalized: f64, b_normalized: f64) -> Self {
        if b_normalized > a_normalized {
            LeadingSignal::BLeading
        } else {
            LeadingSignal::ALeading
        }
    }

    /// Banner text, e.g. "ETH Recovery Detected - ETH > BTC (ETH/BTC ratio 1.0455)".
    pub fn message(&self, a_label: &str, b_label: &str, ratio: f64) -> String {
        match self {
            LeadingSignal::BLeading => format!(
                "{b_label} Recovery Detected - {b_label} > {a_label} ({b_label}/{a_label} ratio {ratio:.4})"
            ),
            LeadingSignal::ALeading => format!(
                "{a_label} Leading - {a_label} > {b_label} ({b_label}/{a_label} ratio {ratio:.4})"
            ),
        }
    }

    /// Short form, e.g. "ETH leading".
    pub fn leader_label<'a>(&self, a_label: &'a str, b_label: &'a str) -> &'a str {
        match self {
            LeadingSignal::ALeading => a_label,
            LeadingSignal::BLeading => b_label,
        }
    }
}
