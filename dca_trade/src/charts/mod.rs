//! Chart rendering
//!
//! Every renderer draws onto a drawing area it is handed, so several charts
//! never share plotting state. [`render_all`] writes the four standard charts
//! as PNG files.

use crate::comparison::{hour_of_day_profile, weekday_hour_grid, ComparisonTable};
use crate::data::PriceSeries;
use crate::error::{DcaError, Result};
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub mod bar;
pub mod heatmap;

pub use self::bar::draw_ranked_bars;
pub use self::heatmap::{draw_hour_heatmap, draw_weekday_hour_heatmap};

/// Fill used for heatmap cells without any purchase
pub const EMPTY_CELL: RGBColor = RGBColor(150, 150, 150);

const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

/// Blue-white-red colour for `t` in `[0, 1]`
pub fn diverging_color(t: f64) -> RGBColor {
    if !t.is_finite() {
        return EMPTY_CELL;
    }
    let t = t.clamp(0.0, 1.0);
    let (from, to, s) = if t < 0.5 {
        (COOL, NEUTRAL, t * 2.0)
    } else {
        (NEUTRAL, WARM, (t - 0.5) * 2.0)
    };
    let mix = |a: f64, b: f64| (a + (b - a) * s).round() as u8;

    RGBColor(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

/// Finite min and max of `values`, widened when they coincide
pub fn value_range<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if lo > hi {
        return None;
    }
    if lo == hi {
        let pad = (lo.abs() * 0.01).max(0.5);
        return Some((lo - pad, hi + pad));
    }
    Some((lo, hi))
}

/// Position of `value` inside `range`, from 0 to 1
pub fn normalize(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if !value.is_finite() {
        return f64::NAN;
    }
    (value - lo) / (hi - lo)
}

pub(crate) fn chart_error<E: std::fmt::Display>(err: E) -> DcaError {
    DcaError::ChartError(err.to_string())
}

/// Vertical colour bar labelled "Average Purchase Price"
pub(crate) fn draw_color_bar<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    range: (f64, f64),
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .margin_top(50)
        .margin_bottom(50)
        .margin_right(10)
        .right_y_label_area_size(80)
        .build_cartesian_2d(0f64..1f64, range.0..range.1)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(0)
        .y_desc("Average Purchase Price")
        .draw()
        .map_err(chart_error)?;

    let steps = 100;
    let step = (range.1 - range.0) / steps as f64;
    chart
        .draw_series((0..steps).map(|i| {
            let y0 = range.0 + step * i as f64;
            let color = diverging_color((i as f64 + 0.5) / steps as f64);
            Rectangle::new([(0.0, y0), (1.0, y0 + step)], color.filled())
        }))
        .map_err(chart_error)?;

    Ok(())
}

/// Paths of the charts written by [`render_all`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartFiles {
    pub paths: Vec<PathBuf>,
}

/// Render the ranked, filtered, weekday×hour and hour-of-day charts as PNG files
pub fn render_all(
    table: &ComparisonTable,
    series: &PriceSeries,
    amount: f64,
    top: usize,
    out_dir: &Path,
    stem: &str,
) -> Result<ChartFiles> {
    let mut files = ChartFiles::default();

    if table.is_empty() {
        warn!("no ranked schedules, skipping bar charts");
    } else {
        let path = out_dir.join(format!("{}_top_strategies.png", stem));
        {
            let root = BitMapBackend::new(&path, (1100, 900)).into_drawing_area();
            draw_ranked_bars(&root, table.top(top), "Overall Top Strategies")?;
            root.present().map_err(chart_error)?;
        }
        files.paths.push(path);

        let filtered = table.without_weekly()?;
        if !filtered.is_empty() {
            let path = out_dir.join(format!("{}_top_strategies_excluding_weekly.png", stem));
            {
                let root = BitMapBackend::new(&path, (1100, 900)).into_drawing_area();
                draw_ranked_bars(&root, filtered.top(top), "Top Strategies (Excluding Weekly)")?;
                root.present().map_err(chart_error)?;
            }
            files.paths.push(path);
        }
    }

    let grid = weekday_hour_grid(series, amount)?;
    let path = out_dir.join(format!("{}_weekday_hour_heatmap.png", stem));
    {
        let root = BitMapBackend::new(&path, (1300, 700)).into_drawing_area();
        draw_weekday_hour_heatmap(&root, &grid)?;
        root.present().map_err(chart_error)?;
    }
    files.paths.push(path);

    let profile = hour_of_day_profile(series, amount)?;
    let path = out_dir.join(format!("{}_hour_heatmap.png", stem));
    {
        let root = BitMapBackend::new(&path, (600, 900)).into_drawing_area();
        draw_hour_heatmap(&root, &profile)?;
        root.present().map_err(chart_error)?;
    }
    files.paths.push(path);

    info!(charts = files.paths.len(), dir = %out_dir.display(), "charts rendered");
    Ok(files)
}
