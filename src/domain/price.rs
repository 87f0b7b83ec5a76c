//! Closing price series and trading-day price resolution.

use crate::domain::error::DcaError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Immutable, date-sorted closes for one instrument.
///
/// Dates are unique and strictly ascending. Construction sorts the input,
/// drops non-finite closes, and keeps the last point seen for a duplicated date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        let mut points: Vec<PricePoint> =
            points.into_iter().filter(|p| p.close.is_finite()).collect();
        // Stable sort, so among equal dates the later input point is last.
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        Self {
            symbol: symbol.into(),
            points: deduped,
        }
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Closes rescaled so the first close reads 100.
    ///
    /// Empty when the series is empty or starts at a non-positive close.
    pub fn normalized(&self) -> Vec<PricePoint> {
        match self.points.first() {
            Some(first) if first.close > 0.0 => self
                .points
                .iter()
                .map(|p| PricePoint::new(p.date, p.close / first.close * 100.0))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Resolve the close that applies on `date`.
    ///
    /// In order: the close on `date` itself; else the close of the most recent
    /// trading day before `date`; else, when `date` predates the whole series,
    /// the earliest close. Fails only for an empty series.
    pub fn resolve(&self, date: NaiveDate) -> Result<f64, DcaError> {
        // Number of points dated on or before `date`.
        let idx = self.points.partition_point(|p| p.date <= date);
        let point = match idx {
            0 => self.points.first(),
            n => self.points.get(n - 1),
        };
        point
            .map(|p| p.close)
            .ok_or_else(|| DcaError::NoPriceAvailable {
                symbol: self.symbol.clone(),
            })
    }
}
