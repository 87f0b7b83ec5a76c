//! Per-strategy analysis: simulation, cash flows and XIRR in one result.
//!
//! [`AnalysisConfig`] holds the run parameters shared by both strategies.

use chrono::{NaiveDate, Weekday};

use super::cash_flow::{self, CashFlow};
use super::error::DcaError;
use super::portfolio::PortfolioSnapshot;
use super::price::PriceSeries;
use super::simulation::simulate;
use super::xirr::XirrSolver;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub amount: f64,
    pub weekday: Weekday,
    pub symbol_a: String,
    pub symbol_b: String,
    pub solver: XirrSolver,
}

impl AnalysisConfig {
    /// Reject inputs no analysis can run on. Checked before any computation.
    pub fn validate(&self) -> Result<(), DcaError> {
        if self.start_date >= self.end_date {
            return Err(DcaError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(DcaError::InvalidAmount {
                amount: self.amount,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub symbol: String,
    pub total_invested: f64,
    pub total_shares: f64,
    pub current_price: f64,
    pub current_value: f64,
    pub average_cost_per_share: f64,
    pub total_return_pct: f64,
    /// Close-to-close price move over the series, in percent.
    pub price_change_pct: f64,
    pub xirr: f64,
    pub snapshots: Vec<PortfolioSnapshot>,
    pub cash_flows: Vec<CashFlow>,
}

impl AnalysisResult {
    pub fn number_of_investments(&self) -> usize {
        self.snapshots.len()
    }

    pub fn profit(&self) -> f64 {
        self.current_value - self.total_invested
    }

    pub fn snapshot_on(&self, date: NaiveDate) -> Option<&PortfolioSnapshot> {
        self.snapshots
            .binary_search_by_key(&date, |s| s.date)
            .ok()
            .map(|i| &self.snapshots[i])
    }
}

/// Run one DCA strategy over `dates` and measure it.
///
/// Cash flows cover only the dates on which a purchase happened. The terminal
/// valuation is dated at the last price in the series, or at the last
/// scheduled date when the series is empty.
pub fn analyze(
    series: &PriceSeries,
    dates: &[NaiveDate],
    amount: f64,
    solver: &XirrSolver,
) -> AnalysisResult {
    let sim = simulate(series, dates, amount);

    let valuation_date = series
        .last()
        .map(|p| p.date)
        .or_else(|| dates.last().copied());
    let cash_flows = cash_flow::build(
        &sim.investment_dates(),
        amount,
        sim.current_value,
        valuation_date,
    );
    let xirr = solver.solve(&cash_flows);

    let total_invested = sim.state.total_invested;
    let total_return_pct = if total_invested > 0.0 {
        (sim.current_value / total_invested - 1.0) * 100.0
    } else {
        0.0
    };

    let price_change_pct = series
        .normalized()
        .last()
        .map(|p| p.close - 100.0)
        .unwrap_or(0.0);

    AnalysisResult {
        symbol: series.symbol().to_string(),
        total_invested,
        total_shares: sim.state.total_shares,
        current_price: sim.current_price,
        current_value: sim.current_value,
        average_cost_per_share: sim.average_cost_per_share,
        total_return_pct,
        price_change_pct,
        xirr,
        snapshots: sim.snapshots,
        cash_flows,
    }
}
