//! Interactive date-range selection and the end-to-end run

use crate::charts::{render_all, ChartFiles};
use crate::comparison::{compare_strategies, ComparisonTable};
use crate::config::{parse_date, RunConfig};
use crate::data::{DataLoader, PriceSeries};
use crate::error::{DcaError, Result};
use crate::report::{chart_stem, results_file_name, write_results_csv};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Earliest and latest timestamps of the loaded data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataBounds {
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,
}

impl DataBounds {
    pub fn of(series: &PriceSeries) -> Option<Self> {
        Some(Self {
            first: series.first_timestamp()?,
            last: series.last_timestamp()?,
        })
    }
}

/// A validated, inclusive range of days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Midnight opening the range
    pub fn start_time(&self) -> NaiveDateTime {
        self.start.and_time(chrono::NaiveTime::MIN)
    }

    /// Midnight of the end day; rows later that day fall outside the range
    pub fn end_time(&self) -> NaiveDateTime {
        self.end.and_time(chrono::NaiveTime::MIN)
    }

    /// Rows of `series` between both midnights, inclusive
    pub fn apply(&self, series: &PriceSeries) -> PriceSeries {
        series.between(self.start_time(), self.end_time())
    }
}

/// Why a pair of dates was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Invalid date format. Please enter dates in YYYY-MM-DD format.")]
    InvalidFormat,

    #[error("Please ensure the dates are within the available range and the start date is before the end date.")]
    OutOfRange,
}

impl From<RangeError> for DcaError {
    fn from(err: RangeError) -> Self {
        DcaError::InvalidDateRange(err.to_string())
    }
}

/// Validate user-supplied start and end dates against the data
pub fn parse_date_range(
    start: &str,
    end: &str,
    bounds: &DataBounds,
) -> std::result::Result<DateRange, RangeError> {
    let (Some(start), Some(end)) = (parse_date(start), parse_date(end)) else {
        return Err(RangeError::InvalidFormat);
    };
    let range = DateRange { start, end };

    let within = |t: NaiveDateTime| bounds.first <= t && t <= bounds.last;
    if within(range.start_time()) && within(range.end_time()) && start <= end {
        Ok(range)
    } else {
        Err(RangeError::OutOfRange)
    }
}

/// Where the prompt currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptState {
    AwaitingValidInput,
    Ready(DateRange),
}

/// Asks for a date range until a valid one is entered
pub struct DateRangePrompt<R, W> {
    reader: R,
    writer: W,
    bounds: DataBounds,
    state: PromptState,
}

impl<R: BufRead, W: Write> DateRangePrompt<R, W> {
    pub fn new(reader: R, writer: W, bounds: DataBounds) -> Self {
        Self {
            reader,
            writer,
            bounds,
            state: PromptState::AwaitingValidInput,
        }
    }

    pub fn state(&self) -> PromptState {
        self.state
    }

    /// Ask for both dates once; stays in `AwaitingValidInput` on bad input
    pub fn step(&mut self) -> Result<PromptState> {
        if let PromptState::Ready(_) = self.state {
            return Ok(self.state);
        }

        let start = self.ask("start")?;
        let end = self.ask("end")?;

        match parse_date_range(&start, &end, &self.bounds) {
            Ok(range) => self.state = PromptState::Ready(range),
            Err(err) => {
                debug!(start = %start.trim(), end = %end.trim(), %err, "rejected date range");
                writeln!(self.writer, "{}", err)?;
            }
        }

        Ok(self.state)
    }

    /// Prompt until the range is valid
    pub fn run(mut self) -> Result<DateRange> {
        loop {
            if let PromptState::Ready(range) = self.step()? {
                return Ok(range);
            }
        }
    }

    fn ask(&mut self, which: &str) -> Result<String> {
        write!(
            self.writer,
            "Enter the {} date (YYYY-MM-DD) between {} and {}: ",
            which,
            self.bounds.first.date(),
            self.bounds.last.date()
        )?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(DcaError::InputClosed);
        }
        Ok(line)
    }
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub range: DateRange,
    pub table: ComparisonTable,
    pub results_path: PathBuf,
    pub charts: ChartFiles,
}

/// Run against the process's stdin and stdout
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_with_io(config, stdin.lock(), stdout.lock())
}

/// Load, select a range, compare, export and render
pub fn run_with_io<R: BufRead, W: Write>(
    config: &RunConfig,
    reader: R,
    mut writer: W,
) -> Result<RunSummary> {
    config.validate()?;

    let series = DataLoader::from_csv(&config.data)?;
    let bounds = DataBounds::of(&series)
        .ok_or_else(|| DcaError::DataError("No data found in file".to_string()))?;
    writeln!(
        writer,
        "Data available from {} to {}.",
        bounds.first.date(),
        bounds.last.date()
    )?;

    let range = match config.fixed_range() {
        Some((start, end)) => parse_date_range(start, end, &bounds)?,
        None => DateRangePrompt::new(reader, &mut writer, bounds).run()?,
    };
    info!(start = %range.start, end = %range.end, "date range selected");

    let window = range.apply(&series);
    let table = compare_strategies(&window, config.amount)?;

    std::fs::create_dir_all(&config.output_dir)?;
    let file_name = results_file_name(range.start, range.end);
    let results_path = config.output_dir.join(&file_name);
    write_results_csv(&table, &results_path)?;
    writeln!(writer, "Results saved to '{}'", file_name)?;

    let charts = if config.no_charts {
        ChartFiles::default()
    } else {
        let stem = chart_stem(range.start, range.end);
        let charts = render_all(
            &table,
            &window,
            config.amount,
            config.top,
            &config.output_dir,
            &stem,
        )?;
        for path in &charts.paths {
            writeln!(writer, "Chart saved to '{}'", path.display())?;
        }
        charts
    };

    Ok(RunSummary {
        range,
        table,
        results_path,
        charts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn bounds() -> DataBounds {
        DataBounds {
            first: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            last: NaiveDate::from_ymd_opt(2024, 1, 31)
                .unwrap()
                .and_hms_opt(23, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_parse_date_range_rules() {
        let b = bounds();
        assert!(parse_date_range("2024-01-01", "2024-01-31", &b).is_ok());
        assert_eq!(
            parse_date_range("2024-13-40", "2024-01-31", &b),
            Err(RangeError::InvalidFormat)
        );
        assert_eq!(
            parse_date_range("2024-01-20", "2024-01-10", &b),
            Err(RangeError::OutOfRange)
        );
        assert_eq!(
            parse_date_range("2023-12-31", "2024-01-10", &b),
            Err(RangeError::OutOfRange)
        );
        assert_eq!(
            parse_date_range("2024-01-10", "2024-02-01", &b),
            Err(RangeError::OutOfRange)
        );
    }

    #[test]
    fn test_prompt_state_transitions() {
        let input = Cursor::new("2024-13-40\n2024-01-05\n2024-01-02\n2024-01-09\n");
        let mut output = Vec::new();
        let mut prompt = DateRangePrompt::new(input, &mut output, bounds());

        assert_eq!(prompt.state(), PromptState::AwaitingValidInput);
        assert_eq!(prompt.step().unwrap(), PromptState::AwaitingValidInput);
        let ready = prompt.step().unwrap();
        assert_eq!(
            ready,
            PromptState::Ready(DateRange {
                start: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            })
        );
        // Stays ready without reading more input
        assert_eq!(prompt.step().unwrap(), ready);
        drop(prompt);

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Invalid date format"));
        assert!(text.contains("between 2024-01-01 and 2024-01-31"));
    }

    #[test]
    fn test_prompt_eof_is_error() {
        let prompt = DateRangePrompt::new(Cursor::new("2024-01-02\n"), Vec::new(), bounds());
        assert!(matches!(prompt.run(), Err(DcaError::InputClosed)));
    }

    #[test]
    fn test_range_times_are_midnight() {
        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        };
        assert_eq!(range.start_time().to_string(), "2024-01-02 00:00:00");
        assert_eq!(range.end_time().to_string(), "2024-01-03 00:00:00");
    }
}
