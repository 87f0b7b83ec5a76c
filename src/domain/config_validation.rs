//! Configuration validation.
//!
//! Validates all config fields before an analysis runs.

use crate::domain::error::DcaError;
use crate::domain::schedule::parse_weekday;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DEFAULT_AMOUNT: f64 = 1000.0;
pub const DEFAULT_WEEKDAY: &str = "thursday";
pub const DEFAULT_SYMBOL_A: &str = "ACWI";
pub const DEFAULT_SYMBOL_B: &str = "SPY";

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), DcaError> {
    validate_dates(config)?;
    validate_amount(config)?;
    validate_weekday(config)?;
    validate_symbols(config)?;
    validate_solver(config)?;
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let start_str = config.get_string("analysis", "start_date");
    let end_str = config.get_string("analysis", "end_date");

    let start = parse_date(start_str.as_deref(), "start_date")?;
    let end = parse_date(end_str.as_deref(), "end_date")?;

    if start >= end {
        return Err(DcaError::InvalidDateRange { start, end });
    }
    Ok(())
}

/// Parse a required `[analysis]` date in YYYY-MM-DD form.
pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, DcaError> {
    match value {
        None => Err(DcaError::ConfigMissing {
            section: "analysis".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            DcaError::ConfigInvalid {
                section: "analysis".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }
        }),
    }
}

fn validate_amount(config: &dyn ConfigPort) -> Result<(), DcaError> {
    if config.has_key("analysis", "amount") {
        // A present but non-numeric value must not silently become the default.
        let value = config.get_double("analysis", "amount", f64::NAN);
        if !(value.is_finite() && value > 0.0) {
            return Err(DcaError::ConfigInvalid {
                section: "analysis".to_string(),
                key: "amount".to_string(),
                reason: "amount must be a positive number".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_weekday(config: &dyn ConfigPort) -> Result<(), DcaError> {
    if let Some(value) = config.get_string("analysis", "weekday") {
        if parse_weekday(&value).is_none() {
            return Err(DcaError::ConfigInvalid {
                section: "analysis".to_string(),
                key: "weekday".to_string(),
                reason: format!("unknown weekday '{}'", value.trim()),
            });
        }
    }
    Ok(())
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), DcaError> {
    for key in ["symbol_a", "symbol_b"] {
        if let Some(value) = config.get_string("analysis", key) {
            if value.trim().is_empty() {
                return Err(DcaError::ConfigInvalid {
                    section: "analysis".to_string(),
                    key: key.to_string(),
                    reason: format!("{} must not be empty", key),
                });
            }
        }
    }
    Ok(())
}

fn validate_solver(config: &dyn ConfigPort) -> Result<(), DcaError> {
    if config.has_key("xirr", "max_iterations") && config.get_int("xirr", "max_iterations", 0) < 1 {
        return Err(DcaError::ConfigInvalid {
            section: "xirr".to_string(),
            key: "max_iterations".to_string(),
            reason: "max_iterations must be at least 1".to_string(),
        });
    }
    if config.has_key("xirr", "tolerance") {
        let tolerance = config.get_double("xirr", "tolerance", f64::NAN);
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(DcaError::ConfigInvalid {
                section: "xirr".to_string(),
                key: "tolerance".to_string(),
                reason: "tolerance must be positive".to_string(),
            });
        }
    }
    if config.has_key("xirr", "guess") {
        let guess = config.get_double("xirr", "guess", f64::NAN);
        if !(guess.is_finite() && guess > -1.0) {
            return Err(DcaError::ConfigInvalid {
                section: "xirr".to_string(),
                key: "guess".to_string(),
                reason: "guess must be greater than -1".to_string(),
            });
        }
    }
    Ok(())
}
