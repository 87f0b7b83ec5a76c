//! Two-strategy comparison run and its tabular export rows.

use chrono::NaiveDate;
use tracing::{info, warn};

use super::analysis::{analyze, AnalysisConfig, AnalysisResult};
use super::comparison::{compare, StrategyComparison};
use super::error::DcaError;
use super::schedule;
use crate::ports::data_port::PriceDataPort;

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub config: AnalysisConfig,
    pub schedule: Vec<NaiveDate>,
    pub a: AnalysisResult,
    pub b: AnalysisResult,
    pub comparison: StrategyComparison,
}

/// One scheduled date of the export. `None` where that strategy skipped it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub price_a: Option<f64>,
    pub price_b: Option<f64>,
    pub shares_bought_a: Option<f64>,
    pub shares_bought_b: Option<f64>,
}

impl ComparisonReport {
    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.schedule
            .iter()
            .map(|&date| {
                let a = self.a.snapshot_on(date);
                let b = self.b.snapshot_on(date);
                ExportRow {
                    date,
                    price_a: a.map(|s| s.price),
                    price_b: b.map(|s| s.price),
                    shares_bought_a: a.map(|s| s.shares_bought),
                    shares_bought_b: b.map(|s| s.shares_bought),
                }
            })
            .collect()
    }
}

/// Analyse both configured instruments over one shared weekly schedule.
///
/// An empty price series is not an error; that strategy simply invests
/// nothing. Invalid configuration, data-port failures and a zero-valued
/// baseline are.
pub fn run_comparison(
    port: &dyn PriceDataPort,
    config: &AnalysisConfig,
) -> Result<ComparisonReport, DcaError> {
    config.validate()?;

    let dates = schedule::generate(config.start_date, config.end_date, config.weekday);
    info!(
        dates = dates.len(),
        start = %config.start_date,
        end = %config.end_date,
        weekday = %config.weekday,
        "investment schedule generated"
    );

    let a = analyze_symbol(port, config, &config.symbol_a, &dates)?;
    let b = analyze_symbol(port, config, &config.symbol_b, &dates)?;
    let comparison = compare(&a, &b)?;

    Ok(ComparisonReport {
        config: config.clone(),
        schedule: dates,
        a,
        b,
        comparison,
    })
}

fn analyze_symbol(
    port: &dyn PriceDataPort,
    config: &AnalysisConfig,
    symbol: &str,
    dates: &[NaiveDate],
) -> Result<AnalysisResult, DcaError> {
    let series = port.fetch_prices(symbol, config.start_date, config.end_date)?;
    if series.is_empty() {
        warn!(symbol, "price series is empty, no purchases possible");
    }
    let result = analyze(&series, dates, config.amount, &config.solver);
    info!(
        symbol,
        investments = result.number_of_investments(),
        xirr = result.xirr,
        "strategy analysed"
    );
    Ok(result)
}
