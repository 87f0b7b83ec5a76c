//! Signed cash flows for rate-of-return analysis.

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashFlowKind {
    /// Capital paid into the strategy (negative amount).
    Investment,
    /// Terminal valuation treated as a redemption (positive amount).
    CurrentValue,
}

impl fmt::Display for CashFlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashFlowKind::Investment => write!(f, "Investment"),
            CashFlowKind::CurrentValue => write!(f, "Current Value"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: f64,
    pub kind: CashFlowKind,
}

impl CashFlow {
    pub fn investment(date: NaiveDate, amount: f64) -> Self {
        Self {
            date,
            amount: -amount,
            kind: CashFlowKind::Investment,
        }
    }

    pub fn current_value(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            amount: value,
            kind: CashFlowKind::CurrentValue,
        }
    }
}

/// One outflow of `amount` per purchase date, then the terminal valuation.
///
/// Without a `valuation_date` the terminal entry is omitted, which only
/// happens when there was neither price data nor a scheduled date.
pub fn build(
    investment_dates: &[NaiveDate],
    amount: f64,
    current_value: f64,
    valuation_date: Option<NaiveDate>,
) -> Vec<CashFlow> {
    let mut flows: Vec<CashFlow> = investment_dates
        .iter()
        .map(|&date| CashFlow::investment(date, amount))
        .collect();
    if let Some(date) = valuation_date {
        flows.push(CashFlow::current_value(date, current_value));
    }
    flows
}

/// The flows to list in a summary: all of them when there are at most
/// `2 * edge`, otherwise the first and last `edge` with a `None` gap marker
/// between them.
pub fn summary_rows(flows: &[CashFlow], edge: usize) -> Vec<Option<&CashFlow>> {
    if flows.len() <= edge * 2 {
        return flows.iter().map(Some).collect();
    }
    flows[..edge]
        .iter()
        .map(Some)
        .chain(std::iter::once(None))
        .chain(flows[flows.len() - edge..].iter().map(Some))
        .collect()
}
