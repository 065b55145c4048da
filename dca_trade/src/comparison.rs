//! Ranking of every DCA schedule by average purchase price

use crate::data::PriceSeries;
use crate::error::Result;
use crate::strategies::{simulate, simulate_daily_dca, simulate_weekly_dca, Strategy, WEEKDAYS};
use tracing::{debug, info, warn};
use trade_math::cost_averaging::relative_deviation_pct;

/// One row of the ranking
#[derive(Debug, Clone, PartialEq)]
pub struct RankedStrategy {
    pub strategy: Strategy,
    pub avg_price: f64,
    /// Percentage above the cheapest row's average price
    pub relative_deviation_pct: f64,
}

/// Schedules sorted ascending by average price, cheapest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonTable {
    rows: Vec<RankedStrategy>,
    unmatched: Vec<Strategy>,
}

impl ComparisonTable {
    /// Rank `(strategy, avg_price)` pairs
    ///
    /// Non-finite prices come from schedules that never bought; they are kept
    /// aside in [`unmatched`](Self::unmatched) instead of being ranked.
    pub fn from_results<I>(results: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Strategy, f64)>,
    {
        let mut priced = Vec::new();
        let mut unmatched = Vec::new();

        for (strategy, avg_price) in results {
            if avg_price.is_finite() {
                priced.push((strategy, avg_price));
            } else {
                unmatched.push(strategy);
            }
        }

        // Stable: ties keep their enumeration order
        priced.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut rows = Vec::with_capacity(priced.len());
        if let Some(&(_, best)) = priced.first() {
            for (strategy, avg_price) in priced {
                rows.push(RankedStrategy {
                    strategy,
                    avg_price,
                    relative_deviation_pct: relative_deviation_pct(avg_price, best)?,
                });
            }
        }

        Ok(Self { rows, unmatched })
    }

    /// Ranked rows, cheapest first
    pub fn rows(&self) -> &[RankedStrategy] {
        &self.rows
    }

    /// Schedules that made no purchase in the data
    pub fn unmatched(&self) -> &[Strategy] {
        &self.unmatched
    }

    pub fn best(&self) -> Option<&RankedStrategy> {
        self.rows.first()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The `n` cheapest rows
    pub fn top(&self, n: usize) -> &[RankedStrategy] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Re-rank without weekly schedules, deviations measured from the best remaining row
    pub fn without_weekly(&self) -> Result<ComparisonTable> {
        let mut table = Self::from_results(
            self.rows
                .iter()
                .filter(|row| !row.strategy.is_weekly())
                .map(|row| (row.strategy, row.avg_price)),
        )?;
        table.unmatched = self
            .unmatched
            .iter()
            .copied()
            .filter(|strategy| !strategy.is_weekly())
            .collect();
        Ok(table)
    }
}

/// Simulate every schedule and rank them
pub fn compare_strategies(series: &PriceSeries, amount: f64) -> Result<ComparisonTable> {
    let strategies = Strategy::all();
    info!(
        strategies = strategies.len(),
        bars = series.len(),
        amount,
        "comparing DCA schedules"
    );

    let mut results = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        let result = simulate(strategy, series, amount)?;
        debug!(
            strategy = %strategy,
            purchases = result.purchases.len(),
            avg_price = result.avg_price,
            "simulated"
        );
        results.push((strategy, result.avg_price));
    }

    let table = ComparisonTable::from_results(results)?;
    if !table.unmatched().is_empty() {
        warn!(
            count = table.unmatched().len(),
            "schedules without any purchase left out of the ranking"
        );
    }
    if let Some(best) = table.best() {
        info!(strategy = %best.strategy, avg_price = best.avg_price, "best schedule");
    }

    Ok(table)
}

/// Average price per weekday (row, Monday first) and hour (column); `NaN` where nothing matched
pub fn weekday_hour_grid(series: &PriceSeries, amount: f64) -> Result<[[f64; 24]; 7]> {
    let mut grid = [[f64::NAN; 24]; 7];

    for (day, &weekday) in WEEKDAYS.iter().enumerate() {
        for hour in 0..24u32 {
            grid[day][hour as usize] = simulate_weekly_dca(series, weekday, hour, amount)?.avg_price;
        }
    }

    Ok(grid)
}

/// Average price of the daily schedule at each hour; `NaN` where nothing matched
pub fn hour_of_day_profile(series: &PriceSeries, amount: f64) -> Result<[f64; 24]> {
    let mut profile = [f64::NAN; 24];

    for hour in 0..24u32 {
        profile[hour as usize] = simulate_daily_dca(series, hour, amount)?.avg_price;
    }

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::hourly_bars;
    use chrono::Weekday;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_results_sorts_and_derives_deviation() {
        let table = ComparisonTable::from_results(vec![
            (Strategy::Daily { hour: 1 }, 120.0),
            (Strategy::Hourly, 100.0),
            (Strategy::Daily { hour: 2 }, f64::NAN),
            (Strategy::Daily { hour: 3 }, 110.0),
        ])
        .unwrap();

        let labels: Vec<String> = table.rows().iter().map(|r| r.strategy.label()).collect();
        assert_eq!(labels, vec!["Hourly", "Daily 03:00", "Daily 01:00"]);
        assert_eq!(table.rows()[0].relative_deviation_pct, 0.0);
        assert!((table.rows()[1].relative_deviation_pct - 10.0).abs() < 1e-9);
        assert!((table.rows()[2].relative_deviation_pct - 20.0).abs() < 1e-9);
        assert_eq!(table.unmatched(), &[Strategy::Daily { hour: 2 }]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let table = ComparisonTable::from_results(vec![
            (Strategy::Daily { hour: 5 }, 50.0),
            (Strategy::Daily { hour: 1 }, 50.0),
        ])
        .unwrap();
        assert_eq!(table.rows()[0].strategy, Strategy::Daily { hour: 5 });
    }

    #[test]
    fn test_top_clamps() {
        let table = ComparisonTable::from_results(vec![(Strategy::Hourly, 1.0)]).unwrap();
        assert_eq!(table.top(30).len(), 1);
        assert!(ComparisonTable::default().top(30).is_empty());
    }

    #[test]
    fn test_without_weekly_rebases_deviation() {
        let table = ComparisonTable::from_results(vec![
            (
                Strategy::Weekly {
                    weekday: Weekday::Mon,
                    hour: 0,
                },
                90.0,
            ),
            (Strategy::Daily { hour: 0 }, 100.0),
            (Strategy::Hourly, 105.0),
        ])
        .unwrap();
        let filtered = table.without_weekly().unwrap();

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.best().unwrap().strategy, Strategy::Daily { hour: 0 });
        assert_eq!(filtered.best().unwrap().relative_deviation_pct, 0.0);
        assert!((filtered.rows()[1].relative_deviation_pct - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_and_profile_shapes() {
        // One full week starting Monday 2024-01-01
        let opens: Vec<f64> = (0..168).map(|i| 100.0 + (i % 24) as f64).collect();
        let series = PriceSeries::from_bars(hourly_bars((2024, 1, 1), &opens));

        let grid = weekday_hour_grid(&series, 100.0).unwrap();
        assert!((grid[0][0] - 100.0).abs() < 1e-9);
        assert!((grid[6][23] - 123.0).abs() < 1e-9);

        let profile = hour_of_day_profile(&series, 100.0).unwrap();
        assert!((profile[5] - 105.0).abs() < 1e-9);
    }
}
