//! Comparison export port trait.

use crate::domain::error::DcaError;
use crate::domain::pipeline::ComparisonReport;
use std::path::Path;

/// Port for writing a finished comparison somewhere durable.
pub trait ReportPort {
    fn write(&self, report: &ComparisonReport, output_path: &Path) -> Result<(), DcaError>;
}
