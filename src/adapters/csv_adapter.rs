//! CSV file price data adapter.
//!
//! One file per instrument, `<dir>/<SYMBOL>.csv`, with a header row. The
//! `date` and `close` columns are located by name, so both a bare
//! `date,close` file and a full `Date,Open,High,Low,Close,Volume` download
//! work. Dates may carry a time suffix; only the leading `YYYY-MM-DD` is used.

use crate::domain::error::DcaError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::data_port::PriceDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, trace};

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, DcaError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| DcaError::Data {
            reason: format!("missing {} column", name),
        })
}

fn parse_date(value: &str) -> Result<NaiveDate, DcaError> {
    let value = value.trim();
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| DcaError::Data {
        reason: format!("invalid date '{}': {}", value, e),
    })
}

/// A usable close, or `None` for blank, NaN or otherwise unparseable cells.
fn parse_close(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

impl PriceDataPort for CsvPriceAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, DcaError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| DcaError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| DcaError::Data {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();
        let date_col = column_index(&headers, "date")?;
        let close_col = column_index(&headers, "close")?;

        let mut points = Vec::new();
        let mut dropped = 0usize;

        for result in rdr.records() {
            let record = result.map_err(|e| DcaError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_col).ok_or_else(|| DcaError::Data {
                reason: "missing date value".into(),
            })?;
            let date = parse_date(date_str)?;

            if date < start_date || date > end_date {
                continue;
            }

            match record.get(close_col).and_then(parse_close) {
                Some(close) => points.push(PricePoint::new(date, close)),
                None => {
                    trace!(symbol, %date, "dropping row without a usable close");
                    dropped += 1;
                }
            }
        }

        let series = PriceSeries::new(symbol, points);
        debug!(
            symbol,
            rows = series.len(),
            dropped,
            path = %path.display(),
            "loaded price series"
        );
        Ok(series)
    }

    fn list_symbols(&self) -> Result<Vec<String>, DcaError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| DcaError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| DcaError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
