//! Cost-averaging calculations
//!
//! Contains the arithmetic behind dollar-cost averaging:
//! - Cost Averager (running totals of currency spent and quantity bought)
//! - Average acquisition cost of a fixed-amount purchase series
//! - Relative deviation from a reference price

use crate::{MathError, Result};

/// Totals accumulated by a [`CostAverager`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostSummary {
    /// Number of purchases made
    pub purchases: usize,
    /// Total currency spent
    pub total_spent: f64,
    /// Total quantity of the asset acquired
    pub total_quantity: f64,
}

impl CostSummary {
    /// Average price paid per unit, `NaN` when nothing was bought
    pub fn average_price(&self) -> f64 {
        if self.purchases == 0 {
            return f64::NAN;
        }
        self.total_spent / self.total_quantity
    }
}

/// Running average acquisition price of repeated purchases
#[derive(Debug, Clone, Default)]
pub struct CostAverager {
    summary: CostSummary,
}

impl CostAverager {
    /// Create an empty averager
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a purchase of `amount` currency at `price`, returning the quantity bought
    pub fn buy(&mut self, amount: f64, price: f64) -> Result<f64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(MathError::InvalidInput(format!(
                "Purchase amount must be positive, got {}",
                amount
            )));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(MathError::InvalidInput(format!(
                "Price must be positive, got {}",
                price
            )));
        }

        let quantity = amount / price;
        self.summary.purchases += 1;
        self.summary.total_spent += amount;
        self.summary.total_quantity += quantity;

        Ok(quantity)
    }

    /// Get the current average acquisition price
    pub fn value(&self) -> Result<f64> {
        if self.summary.purchases == 0 {
            return Err(MathError::InsufficientData(
                "No purchases recorded".to_string(),
            ));
        }

        Ok(self.summary.average_price())
    }

    /// Snapshot of the accumulated totals
    pub fn summary(&self) -> CostSummary {
        self.summary
    }
}

/// Average acquisition price of buying `amount` at each of `prices`
///
/// With a constant amount this is the harmonic mean of the prices:
/// `n / sum(1 / price_i)`.
pub fn average_cost(amount: f64, prices: &[f64]) -> Result<f64> {
    let mut averager = CostAverager::new();
    for &price in prices {
        averager.buy(amount, price)?;
    }
    averager.value()
}

/// Percentage by which `price` exceeds `reference`
pub fn relative_deviation_pct(price: f64, reference: f64) -> Result<f64> {
    if !reference.is_finite() || reference <= 0.0 {
        return Err(MathError::InvalidInput(format!(
            "Reference price must be positive, got {}",
            reference
        )));
    }

    Ok((price - reference) / reference * 100.0)
}
