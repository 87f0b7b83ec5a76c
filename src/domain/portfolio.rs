//! Running DCA holdings and per-purchase snapshots.

use chrono::NaiveDate;

/// Cumulative holdings of one strategy. Both totals only ever grow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioState {
    pub total_shares: f64,
    pub total_invested: f64,
}

impl PortfolioState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buy `amount` worth of shares at `price`, returning the shares bought.
    pub fn buy(&mut self, amount: f64, price: f64) -> f64 {
        let shares = amount / price;
        self.total_shares += shares;
        self.total_invested += amount;
        shares
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.total_shares * price
    }

    /// total_invested / total_shares, or 0 before the first purchase.
    pub fn average_cost_per_share(&self) -> f64 {
        if self.total_shares > 0.0 {
            self.total_invested / self.total_shares
        } else {
            0.0
        }
    }
}

/// Holdings right after one scheduled purchase, valued at that day's price.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSnapshot {
    pub date: NaiveDate,
    pub price: f64,
    pub shares_bought: f64,
    pub total_shares: f64,
    pub cumulative_invested: f64,
    pub portfolio_value: f64,
}
