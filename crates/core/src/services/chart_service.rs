use crate::models::asset::Asset;
use crate::models::chart::{Chart, ChartLine, ChartSet, LineStyle};
use crate::models::frame::AlignedFrame;
use crate::models::portfolio::NormalizedPortfolio;
use crate::models::trend::TrendLine;

const X_LABEL: &str = "Datetime (UTC)";

/// Generates chart-ready data sets from the pipeline output.
///
/// The core computes all the numbers; the front-end only renders.
/// Produces three charts:
/// - Combined normalized portfolio (A, B, 50/50 mix) with a fixed y-range
/// - Asset A price with its EMA trend
/// - Asset B price with its EMA trend
pub struct ChartService;

impl ChartService {
    pub fn build(
        asset_a: &Asset,
        asset_b: &Asset,
        window_days: u32,
        frame: &AlignedFrame,
        portfolio: &NormalizedPortfolio,
        trend_a: &TrendLine,
        trend_b: &TrendLine,
    ) -> ChartSet {
        ChartSet {
            portfolio: Self::portfolio_chart(asset_a, asset_b, window_days, portfolio),
            asset_a: Self::price_chart(asset_a, window_days, frame, frame.column_a(), trend_a),
            asset_b: Self::price_chart(asset_b, window_days, frame, frame.column_b(), trend_b),
        }
    }

    pub fn portfolio_chart(
        asset_a: &Asset,
        asset_b: &Asset,
        window_days: u32,
        portfolio: &NormalizedPortfolio,
    ) -> Chart {
        let line = |name: String, color: &str, width: u32, style: LineStyle, values: &[f64]| {
            ChartLine {
                name,
                color: color.to_string(),
                width,
                style,
                points: portfolio.index.iter().copied().zip(values.iter().copied()).collect(),
            }
        };

        Chart {
            title: format!("Portfolio Performance (Last {window_days} days, normalized)"),
            x_label: X_LABEL.to_string(),
            y_label: "Normalized value (Base = 1.0)".to_string(),
            y_range: portfolio.y_bounds(),
            height: 700,
            lines: vec![
                line(
                    format!("100% {}", asset_a.label),
                    &asset_a.portfolio_color,
                    3,
                    LineStyle::Solid,
                    &portfolio.a,
                ),
                line(
                    format!("100% {}", asset_b.label),
                    &asset_b.portfolio_color,
                    3,
                    LineStyle::Solid,
                    &portfolio.b,
                ),
                line(
                    "50/50 (Average)".to_string(),
                    "black",
                    4,
                    LineStyle::Dashed,
                    &portfolio.mix,
                ),
            ],
        }
    }

    pub fn price_chart(
        asset: &Asset,
        window_days: u32,
        frame: &AlignedFrame,
        prices: &[f64],
        trend: &TrendLine,
    ) -> Chart {
        let index = frame.index();
        Chart {
            title: format!(
                "{} ({}) Price (Last {window_days} days) & {}-period EMA",
                asset.name,
                asset.usd_pair(),
                trend.span
            ),
            x_label: X_LABEL.to_string(),
            y_label: "Price (USD)".to_string(),
            y_range: None,
            height: 600,
            lines: vec![
                ChartLine {
                    name: format!("{} Price", asset.usd_pair()),
                    color: asset.price_color.clone(),
                    width: 3,
                    style: LineStyle::Solid,
                    points: index.iter().copied().zip(prices.iter().copied()).collect(),
                },
                ChartLine {
                    name: format!("{}-period EMA", trend.span),
                    color: asset.trend_color.clone(),
                    width: 3,
                    style: LineStyle::Dotted,
                    points: trend
                        .index
                        .iter()
                        .copied()
                        .zip(trend.values.iter().copied())
                        .collect(),
                },
            ],
        }
    }
}
