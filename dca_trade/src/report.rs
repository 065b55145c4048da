//! CSV export of the ranking

use crate::comparison::ComparisonTable;
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Output file name for a date range, e.g. `dca_strategy_results_2024-01-01_to_2024-02-01.csv`
pub fn results_file_name(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "dca_strategy_results_{}_to_{}.csv",
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    )
}

/// Common prefix of the chart files for a date range
pub fn chart_stem(start: NaiveDate, end: NaiveDate) -> String {
    format!("dca_{}_to_{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
}

#[derive(Debug, Serialize)]
struct ResultRecord {
    #[serde(rename = "Strategy")]
    strategy: String,
    #[serde(rename = "Avg_Price")]
    avg_price: Option<f64>,
    #[serde(rename = "Relative_Deviation")]
    relative_deviation: Option<f64>,
}

/// Write the ranking as CSV, unmatched schedules last with empty prices
pub fn write_results_csv<P: AsRef<Path>>(table: &ComparisonTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;

    for row in table.rows() {
        writer.serialize(ResultRecord {
            strategy: row.strategy.label(),
            avg_price: Some(row.avg_price),
            relative_deviation: Some(row.relative_deviation_pct),
        })?;
    }
    for strategy in table.unmatched() {
        writer.serialize(ResultRecord {
            strategy: strategy.label(),
            avg_price: None,
            relative_deviation: None,
        })?;
    }

    writer.flush()?;
    info!(
        path = %path.display(),
        ranked = table.len(),
        unmatched = table.unmatched().len(),
        "results written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_embed_dates() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();

        assert_eq!(
            results_file_name(start, end),
            "dca_strategy_results_2024-01-05_to_2024-02-09.csv"
        );
        assert_eq!(chart_stem(start, end), "dca_2024-01-05_to_2024-02-09");
    }
}
