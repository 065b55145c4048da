//! # DCA Timing
//!
//! Facade over the workspace crates: `dca_trade` for loading hourly prices,
//! simulating and ranking dollar-cost-averaging schedules, and `trade_math`
//! for the underlying cost-averaging arithmetic.
//!
//! ## Example
//!
//! ```
//! use dca_timing_workspace::trade_math::cost_averaging::average_cost;
//!
//! let avg = average_cost(100.0, &[10.0, 20.0, 30.0]).unwrap();
//! assert!((avg - 16.3636).abs() < 1e-4);
//! ```

pub use dca_trade;
pub use trade_math;

pub use dca_trade::{compare_strategies, ComparisonTable, DcaError, PriceSeries, Strategy};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dca_trade::PriceBar;

    #[test]
    fn test_facade_reexports_comparator() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let bars = (0..24)
            .map(|h| PriceBar::new(start + chrono::Duration::hours(h), 50.0))
            .collect();
        let series = PriceSeries::from_bars(bars);

        let table = compare_strategies(&series, 10.0).unwrap();
        let best = table.best().unwrap();
        assert!((best.avg_price - 50.0).abs() < 1e-9);
        assert_eq!(best.relative_deviation_pct, 0.0);
    }
}
