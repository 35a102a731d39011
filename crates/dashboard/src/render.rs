use chrono::NaiveDate;

use crypto_tracker_core::models::analytics::LeadingSignal;
use crypto_tracker_core::models::report::TrackerReport;
use crypto_tracker_core::models::settings::TrackerConfig;
use crypto_tracker_core::models::snapshot::ViewMode;

use crate::charts::{self, CHART_WIDTH};

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; display: flex; color: #222; }
aside { width: 260px; padding: 1.5rem; background: #f4f5f7; min-height: 100vh; box-sizing: border-box; }
main { flex: 1; padding: 1.5rem 2rem; }
.chart svg { width: 100%; height: auto; }
.tiles { display: flex; gap: 1rem; margin: 1.5rem 0; }
.tile { flex: 1; border: 1px solid #ddd; border-radius: 6px; padding: 1rem; }
.tile .label { font-size: 0.9rem; color: #666; }
.tile .value { font-size: 1.8rem; margin: 0.3rem 0; }
.up { color: #0a7d32; } .down { color: #c62828; }
.banner { padding: 0.8rem 1rem; border-radius: 6px; margin: 0.8rem 0; }
.success { background: #e6f4ea; } .warning { background: #fff4e5; } .info { background: #e8f0fe; } .error { background: #fdecea; }
footer { color: #777; font-size: 0.85rem; border-top: 1px solid #ddd; margin-top: 2rem; padding-top: 0.8rem; }
"#;

/// Full dashboard page for a finished pipeline run.
pub fn dashboard_page(
    config: &TrackerConfig,
    report: &TrackerReport,
    dates: &[NaiveDate],
) -> Result<String, String> {
    let a = &config.asset_a;
    let b = &config.asset_b;
    let summary = &report.summary;

    let portfolio_svg = charts::render_svg(&report.charts.portfolio, CHART_WIDTH)?;
    let a_svg = charts::render_svg(&report.charts.asset_a, CHART_WIDTH)?;
    let b_svg = charts::render_svg(&report.charts.asset_b, CHART_WIDTH)?;

    let refresh = if report.mode.is_live() {
        format!(
            r#"<meta http-equiv="refresh" content="{}">"#,
            config.refresh_interval_secs
        )
    } else {
        String::new()
    };

    let mode_banner = match report.mode {
        ViewMode::Live => r#"<div class="banner success">Live mode: fetching latest Binance prices</div>"#.to_string(),
        ViewMode::Frozen(date) => format!(
            r#"<div class="banner info">Viewing frozen data from: {date}</div>"#
        ),
    };

    let signal_class = match report.signal {
        LeadingSignal::BLeading => "success",
        LeadingSignal::ALeading => "warning",
    };
    let signal_text = report.signal.message(&a.label, &b.label, summary.ratio);

    let tiles = [
        metric_tile(
            &format!("{} normalized", a.label),
            summary.a_normalized,
            summary.a_return_pct,
        ),
        metric_tile(
            &format!("{} normalized", b.label),
            summary.b_normalized,
            summary.b_return_pct,
        ),
        metric_tile(
            &format!("{}/{} ratio", b.label, a.label),
            summary.ratio,
            summary.diff_pct,
        ),
    ]
    .join("\n");

    let title = format!(
        "{} &amp; {} {}-Day Tracker",
        escape(&a.label),
        escape(&b.label),
        config.window_days
    );

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
{refresh}
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<aside>
<h3>Historical Snapshot Viewer</h3>
{selector}
{mode_banner}
</aside>
<main>
<h1>{title}</h1>
<div class="chart">{portfolio_svg}</div>
<div class="chart">{a_svg}</div>
<div class="chart">{b_svg}</div>
<div class="tiles">
{tiles}
</div>
<div class="banner {signal_class}">{signal_text}</div>
<p><a href="/download" download>Download Today's CSV Log</a></p>
<div class="banner success">Latest data logged to: {log_path}</div>
<footer>Notes: Portfolio chart is normalized (start = 1.0). Price charts use absolute USD prices and EMAs. Historical data snapshots are frozen once saved.</footer>
</main>
</body>
</html>
"#,
        selector = date_selector(dates, report.mode),
        signal_text = escape(&signal_text),
        log_path = escape(&report.log_path.display().to_string()),
    ))
}

/// Page shown when a run fails. No charts are rendered.
pub fn error_page(headline: &str, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Crypto Tracker - Error</title><style>{STYLE}</style></head>
<body>
<main>
<h1>Crypto Tracker</h1>
<div class="banner error">{}: {}</div>
<p><a href="/?snapshot=live">Retry live</a></p>
</main>
</body>
</html>
"#,
        escape(headline),
        escape(message)
    )
}

/// Select box listing "Today (Live)" followed by every saved snapshot date.
fn date_selector(dates: &[NaiveDate], mode: ViewMode) -> String {
    let mut options = vec![option("live", "Today (Live)", mode == ViewMode::Live)];
    for date in dates {
        let value = date.format("%Y-%m-%d").to_string();
        options.push(option(&value, &value, mode == ViewMode::Frozen(*date)));
    }
    format!(
        r#"<form method="get" action="/">
<label for="snapshot">Select snapshot date:</label>
<select id="snapshot" name="snapshot" onchange="this.form.submit()">
{}
</select>
<noscript><button type="submit">Show</button></noscript>
</form>"#,
        options.join("\n")
    )
}

fn option(value: &str, text: &str, selected: bool) -> String {
    let selected = if selected { " selected" } else { "" };
    format!(
        r#"<option value="{}"{selected}>{}</option>"#,
        escape(value),
        escape(text)
    )
}

fn metric_tile(label: &str, value: f64, delta_pct: f64) -> String {
    let class = if delta_pct >= 0.0 { "up" } else { "down" };
    format!(
        r#"<div class="tile"><div class="label">{}</div><div class="value">{value:.4}</div><div class="{class}">{delta_pct:.2}%</div></div>"#,
        escape(label)
    )
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
