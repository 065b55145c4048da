//! Fixed-amount purchase simulation for each schedule family

use super::{Strategy, StrategyResult};
use crate::data::PriceSeries;
use crate::error::{DcaError, Result};
use crate::{PriceBar, PurchaseEvent};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use trade_math::cost_averaging::CostAverager;

/// Simulate one schedule over the series, spending `amount` per purchase
pub fn simulate(strategy: Strategy, series: &PriceSeries, amount: f64) -> Result<StrategyResult> {
    match strategy {
        Strategy::Hourly => simulate_hourly_dca(series, amount),
        Strategy::Daily { hour } => simulate_daily_dca(series, hour, amount),
        Strategy::Weekly { weekday, hour } => simulate_weekly_dca(series, weekday, hour, amount),
    }
}

/// Buy at the first observation of every clock hour
pub fn simulate_hourly_dca(series: &PriceSeries, amount: f64) -> Result<StrategyResult> {
    validate_amount(amount)?;

    let mut last_hour: Option<NaiveDateTime> = None;
    let first_per_hour = series.iter().filter(|bar| {
        let hour = hour_start(bar.timestamp);
        if last_hour == Some(hour) {
            return false;
        }
        last_hour = Some(hour);
        true
    });

    purchase(Strategy::Hourly, first_per_hour, amount)
}

/// Buy every day at `hour`
pub fn simulate_daily_dca(series: &PriceSeries, hour: u32, amount: f64) -> Result<StrategyResult> {
    validate_hour(hour)?;
    validate_amount(amount)?;

    let matching = series.iter().filter(|bar| bar.timestamp.hour() == hour);
    purchase(Strategy::Daily { hour }, matching, amount)
}

/// Buy every `weekday` at `hour`
pub fn simulate_weekly_dca(
    series: &PriceSeries,
    weekday: Weekday,
    hour: u32,
    amount: f64,
) -> Result<StrategyResult> {
    validate_hour(hour)?;
    validate_amount(amount)?;

    let matching = series
        .iter()
        .filter(|bar| bar.timestamp.weekday() == weekday && bar.timestamp.hour() == hour);
    purchase(Strategy::Weekly { weekday, hour }, matching, amount)
}

fn purchase<'a>(
    strategy: Strategy,
    bars: impl Iterator<Item = &'a PriceBar>,
    amount: f64,
) -> Result<StrategyResult> {
    let mut averager = CostAverager::new();
    let mut purchases = Vec::new();

    for bar in bars {
        let quantity_bought = averager.buy(amount, bar.open)?;
        purchases.push(PurchaseEvent {
            timestamp: bar.timestamp,
            open_price: bar.open,
            amount_spent: amount,
            quantity_bought,
        });
    }

    Ok(StrategyResult {
        strategy,
        purchases,
        avg_price: averager.summary().average_price(),
    })
}

/// Truncate a timestamp to the start of its hour
fn hour_start(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp
        .date()
        .and_hms_opt(timestamp.hour(), 0, 0)
        .unwrap_or(timestamp)
}

fn validate_hour(hour: u32) -> Result<()> {
    if hour > 23 {
        return Err(DcaError::InvalidParameter(format!(
            "Hour must be between 0-23, got {}",
            hour
        )));
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(DcaError::InvalidParameter(format!(
            "Purchase amount must be positive, got {}",
            amount
        )));
    }
    Ok(())
}
