use chrono::{DateTime, Duration, Utc};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crypto_tracker_core::models::chart::{Chart, LineStyle};

/// Default SVG width; the page scales it to the container.
pub const CHART_WIDTH: u32 = 1200;

/// Render a chart description to an SVG document.
pub fn render_svg(chart: &Chart, width: u32) -> Result<String, String> {
    let (mut x_min, mut x_max) = chart
        .x_range()
        .ok_or_else(|| format!("chart '{}' has no points", chart.title))?;
    if x_min == x_max {
        x_min -= Duration::hours(1);
        x_max += Duration::hours(1);
    }
    let (y_min, y_max) = chart
        .effective_y_range()
        .ok_or_else(|| format!("chart '{}' has no finite values", chart.title))?;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, chart.height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| format!("Failed to fill canvas: {e}"))?;

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 24.0).into_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| format!("Failed to build chart: {e}"))?;

        ctx.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_label_formatter(&|dt: &DateTime<Utc>| dt.format("%m-%d %H:%M").to_string())
            .light_line_style(RGBColor(235, 235, 235))
            .draw()
            .map_err(|e| format!("Failed to draw mesh: {e}"))?;

        for line in &chart.lines {
            let style = ShapeStyle::from(&parse_color(&line.color)).stroke_width(line.width);
            let points = line.points.iter().copied();
            let anno = match line.style {
                LineStyle::Solid => ctx.draw_series(LineSeries::new(points, style)),
                LineStyle::Dashed => ctx.draw_series(DashedLineSeries::new(points, 12, 8, style)),
                LineStyle::Dotted => ctx.draw_series(DashedLineSeries::new(points, 3, 5, style)),
            }
            .map_err(|e| format!("Failed to draw '{}': {e}", line.name))?;

            anno.label(line.name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], style));
        }

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .border_style(&BLACK)
            .draw()
            .map_err(|e| format!("Failed to draw legend: {e}"))?;

        root.present()
            .map_err(|e| format!("Failed to finish chart: {e}"))?;
    }
    Ok(svg)
}

/// `#RRGGBB` or one of the named colors the tracker uses.
fn parse_color(color: &str) -> RGBColor {
    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            if let (Some(r), Some(g), Some(b)) = (channel(0), channel(2), channel(4)) {
                return RGBColor(r, g, b);
            }
        }
    }
    match color.to_ascii_lowercase().as_str() {
        "black" => RGBColor(0, 0, 0),
        "orange" => RGBColor(255, 165, 0),
        "purple" => RGBColor(128, 0, 128),
        "green" => RGBColor(0, 128, 0),
        "red" => RGBColor(255, 0, 0),
        "gray" | "grey" => RGBColor(128, 128, 128),
        "steelblue" => RGBColor(70, 130, 180),
        "slateblue" => RGBColor(106, 90, 205),
        _ => RGBColor(31, 119, 180),
    }
}
