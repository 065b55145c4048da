//! Horizontal bar chart of deviation from the cheapest schedule

use super::chart_error;
use crate::comparison::RankedStrategy;
use crate::error::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

const BAR_COLOR: RGBColor = RGBColor(135, 206, 235);

/// Axis label of a ranked row, e.g. `Daily 03:00 (1.25% Dev.)`
pub fn bar_label(row: &RankedStrategy) -> String {
    format!("{} ({:.2}% Dev.)", row.strategy, row.relative_deviation_pct)
}

/// Draw `rows` (already ranked) with the best one at the top
pub fn draw_ranked_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[RankedStrategy],
    title: &str,
) -> Result<()> {
    area.fill(&WHITE).map_err(chart_error)?;
    if rows.is_empty() {
        return Ok(());
    }

    let n = rows.len();
    let labels: Vec<String> = rows.iter().map(bar_label).collect();
    let max_dev = rows
        .iter()
        .map(|row| row.relative_deviation_pct)
        .fold(0.0, f64::max);
    let x_max = if max_dev > 0.0 { max_dev * 1.1 } else { 1.0 };

    // Rank 0 sits at the top row
    let row_y = |rank: usize| (n - 1 - rank) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(280)
        .build_cartesian_2d(0f64..x_max, -0.5f64..(n as f64 - 0.5))
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&|y| {
            let idx = y.round();
            if (y - idx).abs() > 1e-6 || idx < 0.0 || idx as usize >= n {
                return String::new();
            }
            labels[n - 1 - idx as usize].clone()
        })
        .x_desc("Deviation from Best Price (%)")
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(rows.iter().enumerate().map(|(rank, row)| {
            let y = row_y(rank);
            Rectangle::new(
                [(0.0, y - 0.4), (row.relative_deviation_pct, y + 0.4)],
                BAR_COLOR.filled(),
            )
        }))
        .map_err(chart_error)?;

    Ok(())
}
