//! CSV export of a finished comparison, one row per scheduled date.

use crate::domain::error::DcaError;
use crate::domain::pipeline::ComparisonReport;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct CsvExportAdapter;

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.6}", v)).unwrap_or_default()
}

fn csv_error(e: csv::Error) -> DcaError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => DcaError::Io(io),
        other => DcaError::Data {
            reason: format!("CSV write error: {:?}", other),
        },
    }
}

impl CsvExportAdapter {
    /// Default export file name for a run, e.g.
    /// `investment_analysis_2025-01-01_2025-06-30.csv`.
    pub fn default_file_name(report: &ComparisonReport) -> String {
        format!(
            "investment_analysis_{}_{}.csv",
            report.config.start_date, report.config.end_date
        )
    }
}

impl ReportPort for CsvExportAdapter {
    fn write(&self, report: &ComparisonReport, output_path: &Path) -> Result<(), DcaError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(csv_error)?;

        let a = &report.a.symbol;
        let b = &report.b.symbol;
        wtr.write_record([
            "Investment Date".to_string(),
            format!("{} Price", a),
            format!("{} Price", b),
            format!("{} Shares Bought", a),
            format!("{} Shares Bought", b),
        ])
        .map_err(csv_error)?;

        for row in report.export_rows() {
            wtr.write_record([
                row.date.to_string(),
                cell(row.price_a),
                cell(row.price_b),
                cell(row.shares_bought_a),
                cell(row.shares_bought_b),
            ])
            .map_err(csv_error)?;
        }

        wtr.flush()?;
        Ok(())
    }
}
