#![allow(dead_code)]

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use dcavest::domain::analysis::AnalysisConfig;
use dcavest::domain::error::DcaError;
pub use dcavest::domain::price::{PricePoint, PriceSeries};
use dcavest::domain::xirr::XirrSolver;
use dcavest::ports::data_port::PriceDataPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockPriceDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
    pub requests: RefCell<Vec<(String, NaiveDate, NaiveDate)>>,
}

impl MockPriceDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_points(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PriceDataPort for MockPriceDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, DcaError> {
        self.requests
            .borrow_mut()
            .push((symbol.to_string(), start_date, end_date));
        if let Some(reason) = self.errors.get(symbol) {
            return Err(DcaError::Data {
                reason: reason.clone(),
            });
        }
        let points = self
            .data
            .get(symbol)
            .map(|pts| {
                pts.iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        Ok(PriceSeries::new(symbol, points))
    }

    fn list_symbols(&self) -> Result<Vec<String>, DcaError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Weekday closes from `start` for `days` calendar days, priced by `close(day_index)`.
pub fn trading_days(start: NaiveDate, days: i64, close: impl Fn(i64) -> f64) -> Vec<PricePoint> {
    (0..days)
        .map(|i| (i, start + Duration::days(i)))
        .filter(|(_, d)| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .map(|(i, d)| PricePoint::new(d, close(i)))
        .collect()
}

pub fn sample_config() -> AnalysisConfig {
    AnalysisConfig {
        start_date: date(2025, 1, 1),
        end_date: date(2025, 6, 30),
        amount: 1000.0,
        weekday: Weekday::Thu,
        symbol_a: "ACWI".into(),
        symbol_b: "SPY".into(),
        solver: XirrSolver::default(),
    }
}
