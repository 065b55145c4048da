//! Run configuration for the `dca_compare` binary

use crate::error::{DcaError, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Compare dollar-cost-averaging schedules over historical hourly prices
#[derive(Debug, Clone, Parser)]
#[command(name = "dca_compare", version, about)]
pub struct RunConfig {
    /// CSV file with Timestamp and Open columns
    #[arg(long, env = "DCA_DATA_FILE", default_value = "btc_data_hourly.csv")]
    pub data: PathBuf,

    /// Currency spent on every purchase
    #[arg(long, env = "DCA_AMOUNT", default_value_t = 100.0)]
    pub amount: f64,

    /// First day of the range (YYYY-MM-DD); prompts when omitted
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// Last day of the range (YYYY-MM-DD); prompts when omitted
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// Directory receiving the results CSV and the charts
    #[arg(long, env = "DCA_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Number of schedules shown in the bar charts
    #[arg(long, default_value_t = 30)]
    pub top: usize,

    /// Skip chart rendering
    #[arg(long, default_value_t = false)]
    pub no_charts: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from("btc_data_hourly.csv"),
            amount: 100.0,
            start: None,
            end: None,
            output_dir: PathBuf::from("."),
            top: 30,
            no_charts: false,
        }
    }
}

impl RunConfig {
    /// Check values clap cannot express
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(DcaError::InvalidParameter(format!(
                "Purchase amount must be positive, got {}",
                self.amount
            )));
        }
        if self.top == 0 {
            return Err(DcaError::InvalidParameter(
                "Top must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Start and end given on the command line, if both are set
    pub fn fixed_range(&self) -> Option<(&str, &str)> {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => Some((start.as_str(), end.as_str())),
            _ => None,
        }
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let config = RunConfig::try_parse_from([
            "dca_compare",
            "--data",
            "prices.csv",
            "--amount",
            "25",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-31",
            "--no-charts",
        ])
        .unwrap();

        assert_eq!(config.data, PathBuf::from("prices.csv"));
        assert_eq!(config.amount, 25.0);
        assert_eq!(config.fixed_range(), Some(("2024-01-01", "2024-01-31")));
        assert!(config.no_charts);
        assert_eq!(config.top, 30);
    }

    #[test]
    fn test_start_requires_end() {
        assert!(RunConfig::try_parse_from(["dca_compare", "--start", "2024-01-01"]).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(RunConfig::default().validate().is_ok());

        let config = RunConfig {
            amount: 0.0,
            ..RunConfig::default()
        };
        assert!(matches!(config.validate(), Err(DcaError::InvalidParameter(_))));

        let config = RunConfig {
            top: 0,
            ..RunConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(" 2024-02-29 "), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_date("2024-13-40"), None);
        assert_eq!(parse_date("02/03/2024"), None);
    }
}
