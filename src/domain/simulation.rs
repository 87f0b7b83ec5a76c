//! Replays a fixed-amount purchase schedule against a price series.

use chrono::NaiveDate;
use tracing::trace;

use super::portfolio::{PortfolioSnapshot, PortfolioState};
use super::price::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub state: PortfolioState,
    pub snapshots: Vec<PortfolioSnapshot>,
    /// Last close of the series, 0 for an empty series.
    pub current_price: f64,
    /// Final holdings valued at `current_price`.
    pub current_value: f64,
    pub average_cost_per_share: f64,
}

impl Simulation {
    /// Dates on which a purchase actually happened.
    pub fn investment_dates(&self) -> Vec<NaiveDate> {
        self.snapshots.iter().map(|s| s.date).collect()
    }
}

/// Buy `amount` worth of shares on each of `dates`, in order.
///
/// A date whose price cannot be resolved, or resolves to a non-positive close,
/// is skipped without a snapshot. Each snapshot is valued at its own date's
/// price; only `current_value` uses the final close.
pub fn simulate(series: &PriceSeries, dates: &[NaiveDate], amount: f64) -> Simulation {
    let mut state = PortfolioState::new();
    let mut snapshots = Vec::with_capacity(dates.len());

    for &date in dates {
        let price = match series.resolve(date) {
            Ok(p) if p > 0.0 => p,
            Ok(p) => {
                trace!(symbol = series.symbol(), %date, price = p, "skipping non-positive price");
                continue;
            }
            Err(e) => {
                trace!(symbol = series.symbol(), %date, error = %e, "skipping unresolved date");
                continue;
            }
        };

        let shares_bought = state.buy(amount, price);
        snapshots.push(PortfolioSnapshot {
            date,
            price,
            shares_bought,
            total_shares: state.total_shares,
            cumulative_invested: state.total_invested,
            portfolio_value: state.market_value(price),
        });
    }

    let current_price = series.last().map(|p| p.close).unwrap_or(0.0);
    let current_value = state.market_value(current_price);
    let average_cost_per_share = state.average_cost_per_share();

    Simulation {
        state,
        snapshots,
        current_price,
        current_value,
        average_cost_per_share,
    }
}
