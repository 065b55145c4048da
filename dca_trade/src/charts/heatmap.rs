//! Heatmaps of average purchase price per time bucket

use super::{chart_error, diverging_color, draw_color_bar, normalize, value_range};
use crate::error::Result;
use crate::strategies::{weekday_name, WEEKDAYS};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const COLOR_BAR_WIDTH: u32 = 150;

/// Chart row of a weekday, Monday at the top
pub fn weekday_row(day: usize) -> usize {
    WEEKDAYS.len() - 1 - day
}

/// Draw a 7×24 grid of average prices; `grid[day][hour]` with Monday as day 0
pub fn draw_weekday_hour_heatmap<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    grid: &[[f64; 24]; 7],
) -> Result<()> {
    area.fill(&WHITE).map_err(chart_error)?;
    let area = area
        .titled(
            "Heatmap of Weekly DCA Strategies (Mon to Sun)",
            ("sans-serif", 28).into_font(),
        )
        .map_err(chart_error)?;

    let width = area.dim_in_pixel().0;
    let (plot_area, bar_area) = area.split_horizontally(width.saturating_sub(COLOR_BAR_WIDTH));
    let range = value_range(grid.iter().flatten());

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(110)
        .build_cartesian_2d(-0.5f64..23.5f64, -0.5f64..6.5f64)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(24)
        .y_labels(7)
        .x_label_formatter(&|x| format!("{}", x.round() as i64))
        .y_label_formatter(&|y| {
            let row = y.round();
            if (y - row).abs() > 1e-6 || !(0.0..7.0).contains(&row) {
                return String::new();
            }
            weekday_name(WEEKDAYS[weekday_row(row as usize)]).to_string()
        })
        .x_desc("Hour of Day")
        .y_desc("Day of Week")
        .draw()
        .map_err(chart_error)?;

    let cells = grid.iter().enumerate().flat_map(|(day, hours)| {
        hours.iter().enumerate().map(move |(hour, &price)| {
            let color = match range {
                Some(range) => diverging_color(normalize(price, range)),
                None => diverging_color(f64::NAN),
            };
            let x = hour as f64;
            let y = weekday_row(day) as f64;
            Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], color.filled())
        })
    });
    chart.draw_series(cells).map_err(chart_error)?;

    if let Some(range) = range {
        draw_color_bar(&bar_area, range)?;
    }

    Ok(())
}

/// Draw a single column of 24 hours, hour 23 at the top, each cell labelled with its price
pub fn draw_hour_heatmap<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    profile: &[f64; 24],
) -> Result<()> {
    area.fill(&WHITE).map_err(chart_error)?;
    let area = area
        .titled("Heatmap of Hourly DCA Strategies", ("sans-serif", 24).into_font())
        .map_err(chart_error)?;

    let width = area.dim_in_pixel().0;
    let (plot_area, bar_area) = area.split_horizontally(width.saturating_sub(COLOR_BAR_WIDTH));
    let range = value_range(profile.iter());

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(15)
        .x_label_area_size(20)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..0.5f64, -0.5f64..23.5f64)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(0)
        .y_labels(24)
        .y_label_formatter(&|y| format!("{}", y.round() as i64))
        .y_desc("Hour of Day")
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(profile.iter().enumerate().map(|(hour, &price)| {
            let color = match range {
                Some(range) => diverging_color(normalize(price, range)),
                None => diverging_color(f64::NAN),
            };
            let y = hour as f64;
            Rectangle::new([(-0.5, y - 0.5), (0.5, y + 0.5)], color.filled())
        }))
        .map_err(chart_error)?;

    let label_style = ("sans-serif", 16)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart
        .draw_series(
            profile
                .iter()
                .enumerate()
                .filter(|(_, price)| price.is_finite())
                .map(|(hour, price)| {
                    Text::new(format!("{:.2}", price), (0.0, hour as f64), label_style.clone())
                }),
        )
        .map_err(chart_error)?;

    if let Some(range) = range {
        draw_color_bar(&bar_area, range)?;
    }

    Ok(())
}
