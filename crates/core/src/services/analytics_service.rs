use crate::errors::CoreError;
use crate::models::analytics::{LeadingSignal, SummaryMetrics};
use crate::models::portfolio::NormalizedPortfolio;

/// Computes the headline metrics and the leading-asset signal.
///
/// Everything is derived from the final row of the normalized portfolio:
/// - Each asset's normalized value and % return since the window start
/// - The B/A ratio and the difference between the two returns
/// - Which asset leads (B only on a strictly greater normalized value)
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn summarize(portfolio: &NormalizedPortfolio) -> Result<SummaryMetrics, CoreError> {
        let last = portfolio
            .last_row()
            .ok_or_else(|| CoreError::InsufficientData("portfolio has no rows".into()))?;
        Ok(Self::from_final_values(last.a, last.b, last.mix))
    }

    pub fn from_final_values(a_normalized: f64, b_normalized: f64, mix: f64) -> SummaryMetrics {
        let a_return_pct = (a_normalized - 1.0) * 100.0;
        let b_return_pct = (b_normalized - 1.0) * 100.0;
        SummaryMetrics {
            a_normalized,
            b_normalized,
            mix,
            a_return_pct,
            b_return_pct,
            ratio: b_normalized / a_normalized,
            diff_pct: b_return_pct - a_return_pct,
        }
    }

    pub fn signal(summary: &SummaryMetrics) -> LeadingSignal {
        LeadingSignal::from_values(summary.a_normalized, summary.b_normalized)
    }
}
