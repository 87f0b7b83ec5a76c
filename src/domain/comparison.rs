//! Relative metrics between two analysed strategies.

use std::fmt;

use super::analysis::AnalysisResult;
use super::error::DcaError;

/// Which side of a comparison: the baseline `A` or the challenger `B`.
///
/// Kept separate from the symbols, which may be identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyId {
    A,
    B,
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyId::A => write!(f, "A"),
            StrategyId::B => write!(f, "B"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyComparison {
    pub symbol_a: String,
    pub symbol_b: String,
    /// B's current value minus A's.
    pub value_delta: f64,
    /// B's total return % minus A's, in percentage points.
    pub return_pct_delta: f64,
    /// B's XIRR minus A's, as a decimal fraction.
    pub rate_delta: f64,
    pub better_strategy: StrategyId,
    /// How much larger B's current value is than A's, in percent.
    pub outperformance_pct: f64,
}

impl StrategyComparison {
    pub fn symbol_of(&self, id: StrategyId) -> &str {
        match id {
            StrategyId::A => &self.symbol_a,
            StrategyId::B => &self.symbol_b,
        }
    }

    pub fn better_symbol(&self) -> &str {
        self.symbol_of(self.better_strategy)
    }
}

/// Compare strategy `b` against baseline `a`.
///
/// `b` is the better strategy only when its XIRR is strictly higher; ties go
/// to `a`. Fails when `a` has no current value to measure against.
pub fn compare(a: &AnalysisResult, b: &AnalysisResult) -> Result<StrategyComparison, DcaError> {
    if a.current_value == 0.0 {
        return Err(DcaError::DivisionUndefined {
            what: format!("{} current value", a.symbol),
        });
    }

    let better_strategy = if b.xirr > a.xirr {
        StrategyId::B
    } else {
        StrategyId::A
    };

    Ok(StrategyComparison {
        symbol_a: a.symbol.clone(),
        symbol_b: b.symbol.clone(),
        value_delta: b.current_value - a.current_value,
        return_pct_delta: b.total_return_pct - a.total_return_pct,
        rate_delta: b.xirr - a.xirr,
        better_strategy,
        outperformance_pct: (b.current_value / a.current_value - 1.0) * 100.0,
    })
}
