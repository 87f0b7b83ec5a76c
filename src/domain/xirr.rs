//! Extended internal rate of return over irregularly dated cash flows.
//!
//! The rate `r` solves `Σ cf_i / (1 + r)^(days_i / 365) = 0`, where `days_i`
//! counts from the earliest cash-flow date. Roots are found with a secant
//! iteration seeded at the solver's guess. When that fails the solver never
//! errors; it answers with a simple (non-compounded) annualized return instead.

use chrono::NaiveDate;
use tracing::debug;

use super::cash_flow::CashFlow;

pub const DAYS_PER_YEAR: f64 = 365.0;

/// Relative step used to place the secant's second seed next to the guess.
const SECANT_SEED_STEP: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XirrSolver {
    pub guess: f64,
    pub max_iterations: usize,
    /// Absolute tolerance between successive rate estimates.
    pub tolerance: f64,
}

impl Default for XirrSolver {
    fn default() -> Self {
        Self {
            guess: 0.10,
            max_iterations: 1000,
            tolerance: 1.48e-8,
        }
    }
}

/// How a rate was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum XirrOutcome {
    Converged { rate: f64, iterations: usize },
    Fallback { rate: f64 },
}

impl XirrOutcome {
    pub fn rate(&self) -> f64 {
        match *self {
            XirrOutcome::Converged { rate, .. } | XirrOutcome::Fallback { rate } => rate,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, XirrOutcome::Fallback { .. })
    }
}

/// Reasons the root-finder gives up. Always absorbed by the fallback.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
enum RootFindingError {
    #[error("cash flows need at least one outflow and one inflow")]
    NoSignChange,
    #[error("no convergence after {iterations} iterations")]
    NonConvergent { iterations: usize },
    #[error("net present value not finite at rate {rate}")]
    NonFinite { rate: f64 },
    #[error("secant slope vanished between {p0} and {p1}")]
    FlatSecant { p0: f64, p1: f64 },
}

impl XirrSolver {
    pub fn new(guess: f64) -> Self {
        Self {
            guess,
            ..Self::default()
        }
    }

    /// Annualized rate for `flows` as a decimal fraction (0.10 = 10%).
    pub fn solve(&self, flows: &[CashFlow]) -> f64 {
        self.solve_detailed(flows).rate()
    }

    pub fn solve_detailed(&self, flows: &[CashFlow]) -> XirrOutcome {
        match self.find_root(flows) {
            Ok((rate, iterations)) => XirrOutcome::Converged { rate, iterations },
            Err(e) => {
                let rate = simple_annualized_rate(flows);
                debug!(
                    error = %e,
                    rate,
                    flows = flows.len(),
                    "xirr fell back to simple annualized rate"
                );
                XirrOutcome::Fallback { rate }
            }
        }
    }

    fn find_root(&self, flows: &[CashFlow]) -> Result<(f64, usize), RootFindingError> {
        let has_outflow = flows.iter().any(|f| f.amount < 0.0);
        let has_inflow = flows.iter().any(|f| f.amount > 0.0);
        if !has_outflow || !has_inflow {
            return Err(RootFindingError::NoSignChange);
        }

        let terms = discount_terms(flows);
        let f = |rate: f64| -> Result<f64, RootFindingError> {
            let value = npv_of_terms(&terms, rate);
            if value.is_finite() {
                Ok(value)
            } else {
                Err(RootFindingError::NonFinite { rate })
            }
        };

        let mut p0 = self.guess;
        let mut p1 = self.guess * (1.0 + SECANT_SEED_STEP);
        p1 += if p1 >= 0.0 {
            SECANT_SEED_STEP
        } else {
            -SECANT_SEED_STEP
        };
        let mut q0 = f(p0)?;
        let mut q1 = f(p1)?;
        if q1.abs() < q0.abs() {
            std::mem::swap(&mut p0, &mut p1);
            std::mem::swap(&mut q0, &mut q1);
        }

        for iteration in 1..=self.max_iterations {
            if q1 == q0 {
                return Err(RootFindingError::FlatSecant { p0, p1 });
            }
            let p = if q1.abs() > q0.abs() {
                (-q0 / q1 * p1 + p0) / (1.0 - q0 / q1)
            } else {
                (-q1 / q0 * p0 + p1) / (1.0 - q1 / q0)
            };
            if !p.is_finite() {
                return Err(RootFindingError::NonFinite { rate: p });
            }
            if (p - p1).abs() < self.tolerance {
                return Ok((p, iteration));
            }
            p0 = p1;
            q0 = q1;
            p1 = p;
            q1 = f(p1)?;
        }

        Err(RootFindingError::NonConvergent {
            iterations: self.max_iterations,
        })
    }
}

/// Net present value of `flows` at `rate`, discounted to the earliest date.
pub fn npv(flows: &[CashFlow], rate: f64) -> f64 {
    npv_of_terms(&discount_terms(flows), rate)
}

/// (amount, years since the earliest flow) pairs.
fn discount_terms(flows: &[CashFlow]) -> Vec<(f64, f64)> {
    let Some(t0) = earliest(flows) else {
        return Vec::new();
    };
    flows
        .iter()
        .map(|f| (f.amount, (f.date - t0).num_days() as f64 / DAYS_PER_YEAR))
        .collect()
}

fn npv_of_terms(terms: &[(f64, f64)], rate: f64) -> f64 {
    terms
        .iter()
        .map(|&(amount, years)| amount / (1.0 + rate).powf(years))
        .sum()
}

fn earliest(flows: &[CashFlow]) -> Option<NaiveDate> {
    flows.iter().map(|f| f.date).min()
}

/// Non-compounded annualized return used when root-finding fails.
///
/// `((inflows / |outflows|) - 1) / years`, where `years` spans the earliest
/// to the latest flow. Zero when nothing was invested or no time elapsed.
pub fn simple_annualized_rate(flows: &[CashFlow]) -> f64 {
    let invested: f64 = flows
        .iter()
        .filter(|f| f.amount < 0.0)
        .map(|f| f.amount)
        .sum::<f64>()
        .abs();
    let returned: f64 = flows.iter().filter(|f| f.amount > 0.0).map(|f| f.amount).sum();

    if invested == 0.0 {
        return 0.0;
    }

    let (Some(min), Some(max)) = (earliest(flows), flows.iter().map(|f| f.date).max()) else {
        return 0.0;
    };
    let years = (max - min).num_days() as f64 / DAYS_PER_YEAR;
    if years == 0.0 {
        return 0.0;
    }

    (returned / invested - 1.0) / years
}
