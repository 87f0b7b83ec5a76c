//! Price history access port trait.

use crate::domain::error::DcaError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait PriceDataPort {
    /// Daily closes of `symbol` dated within `[start_date, end_date]`.
    ///
    /// An instrument without rows in the window yields an empty series, not
    /// an error.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, DcaError>;

    fn list_symbols(&self) -> Result<Vec<String>, DcaError>;
}
