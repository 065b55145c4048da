//! DCA schedules
//!
//! A [`Strategy`] is a time-bucket rule deciding which bars trigger a
//! purchase. The simulators in [`simulator`] apply those rules to a
//! [`PriceSeries`](crate::PriceSeries).

use chrono::Weekday;
use std::fmt;

pub mod simulator;

pub use self::simulator::{simulate, simulate_daily_dca, simulate_hourly_dca, simulate_weekly_dca};

use crate::PurchaseEvent;

/// Weekdays in Monday-first order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a weekday
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// When a DCA schedule buys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Buy at every hour
    Hourly,
    /// Buy every day at `hour`
    Daily { hour: u32 },
    /// Buy every `weekday` at `hour`
    Weekly { weekday: Weekday, hour: u32 },
}

impl Strategy {
    /// Every schedule compared: weekly (Monday 00:00 .. Sunday 23:00), daily, then hourly
    pub fn all() -> Vec<Strategy> {
        let weekly = WEEKDAYS
            .iter()
            .flat_map(|&weekday| (0..24).map(move |hour| Strategy::Weekly { weekday, hour }));
        let daily = (0..24).map(|hour| Strategy::Daily { hour });

        weekly
            .chain(daily)
            .chain(std::iter::once(Strategy::Hourly))
            .collect()
    }

    pub fn is_weekly(&self) -> bool {
        matches!(self, Strategy::Weekly { .. })
    }

    /// Human-readable label, e.g. `Weekly Monday 09:00`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Hourly => write!(f, "Hourly"),
            Strategy::Daily { hour } => write!(f, "Daily {:02}:00", hour),
            Strategy::Weekly { weekday, hour } => {
                write!(f, "Weekly {} {:02}:00", weekday_name(*weekday), hour)
            }
        }
    }
}

/// Outcome of simulating one schedule
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyResult {
    pub strategy: Strategy,
    /// Purchases in timestamp order
    pub purchases: Vec<PurchaseEvent>,
    /// Total spent / total quantity, `NaN` when no bar matched
    pub avg_price: f64,
}

impl StrategyResult {
    /// Whether at least one purchase happened
    pub fn has_purchases(&self) -> bool {
        !self.purchases.is_empty()
    }

    pub fn total_spent(&self) -> f64 {
        self.purchases.iter().map(|p| p.amount_spent).sum()
    }

    pub fn total_quantity(&self) -> f64 {
        self.purchases.iter().map(|p| p.quantity_bought).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_strategies_enumerated() {
        let all = Strategy::all();
        assert_eq!(all.len(), 193);
        assert_eq!(all.iter().filter(|s| s.is_weekly()).count(), 168);
        assert_eq!(
            all[0],
            Strategy::Weekly {
                weekday: Weekday::Mon,
                hour: 0
            }
        );
        assert_eq!(all[168], Strategy::Daily { hour: 0 });
        assert_eq!(all[192], Strategy::Hourly);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Strategy::Hourly.label(), "Hourly");
        assert_eq!(Strategy::Daily { hour: 7 }.label(), "Daily 07:00");
        assert_eq!(
            Strategy::Weekly {
                weekday: Weekday::Sun,
                hour: 23
            }
            .label(),
            "Weekly Sunday 23:00"
        );
    }
}
