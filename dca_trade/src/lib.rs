//! # DCA Trade
//!
//! `dca_trade` simulates dollar-cost-averaging (DCA) schedules over hourly
//! OHLCV price data and ranks them by the average price paid.
//!
//! Every schedule spends the same fixed amount at the `open` of each matching
//! bar. Three families are compared:
//!
//! - **Hourly**: buy at every hour of the data
//! - **Daily**: buy once a day at a given hour (24 variants)
//! - **Weekly**: buy once a week at a given weekday and hour (168 variants)
//!
//! ## Usage Example
//!
//! ```no_run
//! use dca_trade::data::DataLoader;
//! use dca_trade::compare_strategies;
//!
//! let series = DataLoader::from_csv("btc_data_hourly.csv")?;
//! let table = compare_strategies(&series, 100.0)?;
//!
//! if let Some(best) = table.best() {
//!     println!("Cheapest schedule: {} at {:.2}", best.strategy, best.avg_price);
//! }
//! # Ok::<(), dca_trade::DcaError>(())
//! ```

use chrono::NaiveDateTime;

pub mod charts;
pub mod comparison;
pub mod config;
pub mod data;
pub mod driver;
pub mod error;
pub mod report;
pub mod strategies;

pub use crate::comparison::{compare_strategies, ComparisonTable, RankedStrategy};
pub use crate::data::{DataLoader, PriceSeries};
pub use crate::error::{DcaError, Result};
pub use crate::strategies::{
    simulate, simulate_daily_dca, simulate_hourly_dca, simulate_weekly_dca, Strategy,
    StrategyResult,
};

/// One hourly OHLCV row
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    /// Wall-clock timestamp of the bar
    pub timestamp: NaiveDateTime,
    /// Open price, used as the execution price of a purchase
    pub open: f64,
    /// High price
    pub high: Option<f64>,
    /// Low price
    pub low: Option<f64>,
    /// Close price
    pub close: Option<f64>,
    /// Volume
    pub volume: Option<f64>,
}

impl PriceBar {
    /// Create a bar carrying only an open price
    pub fn new(timestamp: NaiveDateTime, open: f64) -> Self {
        Self {
            timestamp,
            open,
            high: None,
            low: None,
            close: None,
            volume: None,
        }
    }
}

/// A single fixed-amount purchase made by a strategy
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseEvent {
    /// When the purchase executed
    pub timestamp: NaiveDateTime,
    /// Execution price
    pub open_price: f64,
    /// Currency spent
    pub amount_spent: f64,
    /// Asset quantity acquired (`amount_spent / open_price`)
    pub quantity_bought: f64,
}
