//! Hourly price data loading

use crate::error::{DcaError, Result};
use crate::PriceBar;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

/// Text layouts accepted in the timestamp column, tried in order
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Time-ordered price bars, loaded once and never mutated
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series from bars in any order; equal timestamps keep their input order
    pub fn from_bars(mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|bar| bar.timestamp);
        Self { bars }
    }

    /// Bars in ascending timestamp order
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceBar> {
        self.bars.iter()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Earliest timestamp in the series
    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.bars.first().map(|bar| bar.timestamp)
    }

    /// Latest timestamp in the series
    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.bars.last().map(|bar| bar.timestamp)
    }

    /// Bars with `start <= timestamp <= end`
    pub fn between(&self, start: NaiveDateTime, end: NaiveDateTime) -> PriceSeries {
        let from = self.bars.partition_point(|bar| bar.timestamp < start);
        let to = self.bars.partition_point(|bar| bar.timestamp <= end);
        let bars = if from < to {
            self.bars[from..to].to_vec()
        } else {
            Vec::new()
        };
        PriceSeries { bars }
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a PriceBar;
    type IntoIter = std::slice::Iter<'a, PriceBar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}

/// Data loader for hourly price CSV files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a price series from a CSV file with `Timestamp` and `Open` columns
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<PriceSeries> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading price data");

        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df)
    }

    /// Convert an existing DataFrame into a price series
    pub fn from_dataframe(df: DataFrame) -> Result<PriceSeries> {
        if df.height() == 0 {
            return Err(DcaError::DataError("No data found in file".to_string()));
        }

        let time_column = Self::find_column(&df, |name| name == "timestamp")
            .ok_or_else(|| DcaError::DataError("Missing Timestamp column".to_string()))?;
        let open_column = Self::find_column(&df, |name| name == "open")
            .ok_or_else(|| DcaError::DataError("Missing Open column".to_string()))?;

        let timestamps = Self::timestamps(df.column(&time_column)?)?;
        let opens = Self::float_column(&df, Some(open_column))?;
        let highs = Self::float_column(&df, Self::find_column(&df, |name| name == "high"))?;
        let lows = Self::float_column(&df, Self::find_column(&df, |name| name == "low"))?;
        let closes = Self::float_column(&df, Self::find_column(&df, |name| name == "close"))?;
        let volumes = Self::float_column(&df, Self::find_column(&df, |name| name.starts_with("volume")))?;

        let mut bars = Vec::with_capacity(df.height());
        let mut skipped = 0usize;

        for (i, timestamp) in timestamps.into_iter().enumerate() {
            let open = match opens[i] {
                Some(open) if open.is_finite() && open > 0.0 => open,
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            bars.push(PriceBar {
                timestamp,
                open,
                high: highs[i],
                low: lows[i],
                close: closes[i],
                volume: volumes[i],
            });
        }

        if skipped > 0 {
            warn!(skipped, "skipped rows without a usable open price");
        }
        if bars.is_empty() {
            return Err(DcaError::DataError(
                "No rows with a usable open price".to_string(),
            ));
        }

        let series = PriceSeries::from_bars(bars);
        debug!(
            rows = series.len(),
            first = ?series.first_timestamp(),
            last = ?series.last_timestamp(),
            "price data loaded"
        );
        Ok(series)
    }

    /// Find a column by its lowercase name
    fn find_column(df: &DataFrame, matches: impl Fn(&str) -> bool) -> Option<String> {
        df.get_column_names()
            .into_iter()
            .find(|name| matches(&name.to_lowercase()))
            .map(|name| name.to_string())
    }

    /// Read a column as floats, or all `None` when the column is absent
    fn float_column(df: &DataFrame, name: Option<String>) -> Result<Vec<Option<f64>>> {
        let Some(name) = name else {
            return Ok(vec![None; df.height()]);
        };

        let values = df.column(&name)?.cast(&DataType::Float64)?;
        let values = values.f64()?.into_iter().collect();
        Ok(values)
    }

    /// Parse the timestamp column, whatever type the CSV reader inferred for it
    fn timestamps(column: &Series) -> Result<Vec<NaiveDateTime>> {
        let parsed: Vec<Option<NaiveDateTime>> = match column.dtype() {
            DataType::Utf8 => column
                .utf8()?
                .into_iter()
                .map(|value| value.and_then(parse_timestamp))
                .collect(),
            DataType::Datetime(unit, _) => {
                let per_second = match unit {
                    TimeUnit::Nanoseconds => 1_000_000_000,
                    TimeUnit::Microseconds => 1_000_000,
                    TimeUnit::Milliseconds => 1_000,
                };
                let raw = column.cast(&DataType::Int64)?;
                let raw = raw.i64()?;
                raw.into_iter()
                    .map(|value| value.and_then(|v| from_epoch(v, per_second)))
                    .collect()
            }
            DataType::Date => {
                let days = column.cast(&DataType::Int32)?;
                let days = days.i32()?;
                days.into_iter()
                    .map(|value| value.and_then(|d| from_epoch(i64::from(d) * 86_400, 1)))
                    .collect()
            }
            dtype if dtype.is_numeric() => {
                let seconds = column.cast(&DataType::Float64)?;
                let seconds = seconds.f64()?;
                seconds.into_iter()
                    .map(|value| value.and_then(from_epoch_seconds))
                    .collect()
            }
            other => {
                return Err(DcaError::DataError(format!(
                    "Unsupported Timestamp column type: {}",
                    other
                )))
            }
        };

        parsed
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                value.ok_or_else(|| {
                    // Header is line 1
                    DcaError::DataError(format!("Invalid timestamp at line {}", i + 2))
                })
            })
            .collect()
    }
}

/// Parse a textual timestamp into a wall-clock date-time
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn from_epoch(value: i64, per_second: i64) -> Option<NaiveDateTime> {
    let seconds = value.div_euclid(per_second);
    let nanos = value.rem_euclid(per_second) * (1_000_000_000 / per_second);
    DateTime::from_timestamp(seconds, nanos as u32).map(|dt| dt.naive_utc())
}

fn from_epoch_seconds(value: f64) -> Option<NaiveDateTime> {
    if !value.is_finite() {
        return None;
    }
    let seconds = value.floor();
    let nanos = ((value - seconds) * 1e9).round().min(999_999_999.0);
    DateTime::from_timestamp(seconds as i64, nanos as u32).map(|dt| dt.naive_utc())
}
