//! CLI integration tests.
//!
//! Tests cover:
//! - Config parsing (build_analysis_config, build_solver)
//! - Validate and list-symbols commands with real files on disk
//! - Full analyze runs over CSV price files and the CSV export

mod common;

use chrono::Weekday;
use common::*;
use dcavest::adapters::csv_export_adapter::CsvExportAdapter;
use dcavest::adapters::file_config_adapter::FileConfigAdapter;
use dcavest::cli::{self, Cli, Command};
use dcavest::domain::error::DcaError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ExitCode has no PartialEq; compare through its Debug form.
fn same_code(actual: ExitCode, expected: ExitCode) -> bool {
    format!("{actual:?}") == format!("{expected:?}")
}

const VALID_INI: &str = r#"
[analysis]
start_date = 2025-01-01
end_date = 2025-03-31
amount = 500
weekday = thursday
symbol_a = acwi
symbol_b = spy

[xirr]
guess = 0.05
max_iterations = 250
tolerance = 1e-10
"#;

mod config_loading {
    use super::*;

    #[test]
    fn build_analysis_config_valid_full() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let config = cli::build_analysis_config(&adapter).unwrap();

        assert_eq!(config.start_date, date(2025, 1, 1));
        assert_eq!(config.end_date, date(2025, 3, 31));
        assert_eq!(config.amount, 500.0);
        assert_eq!(config.weekday, Weekday::Thu);
        assert_eq!(config.symbol_a, "ACWI");
        assert_eq!(config.symbol_b, "SPY");
        assert_eq!(config.solver.guess, 0.05);
        assert_eq!(config.solver.max_iterations, 250);
        assert_eq!(config.solver.tolerance, 1e-10);
    }

    #[test]
    fn build_analysis_config_uses_defaults() {
        let ini = "[analysis]\nstart_date = 2025-01-01\nend_date = 2025-12-31\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let config = cli::build_analysis_config(&adapter).unwrap();

        assert_eq!(config.amount, 1000.0);
        assert_eq!(config.weekday, Weekday::Thu);
        assert_eq!(config.symbol_a, "ACWI");
        assert_eq!(config.symbol_b, "SPY");
        assert_eq!(config.solver, dcavest::domain::xirr::XirrSolver::default());
    }

    #[test]
    fn build_analysis_config_missing_end_date() {
        let ini = "[analysis]\nstart_date = 2025-01-01\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = cli::build_analysis_config(&adapter).unwrap_err();
        assert!(matches!(err, DcaError::ConfigMissing { key, .. } if key == "end_date"));
    }

    #[test]
    fn build_analysis_config_reversed_dates() {
        let ini = "[analysis]\nstart_date = 2025-12-31\nend_date = 2025-01-01\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = cli::build_analysis_config(&adapter).unwrap_err();
        assert!(matches!(err, DcaError::InvalidDateRange { .. }));
        assert!(same_code((&err).into(), ExitCode::from(4)));
    }

    #[test]
    fn build_solver_ignores_negative_iterations() {
        let adapter = FileConfigAdapter::from_string("[xirr]\nmax_iterations = -3\n").unwrap();
        let solver = cli::build_solver(&adapter);
        assert_eq!(solver.max_iterations, 1000);
    }
}

mod commands {
    use super::*;

    fn run(command: Command) -> ExitCode {
        cli::run(Cli { command })
    }

    fn write_prices(dir: &Path, symbol: &str, points: &[PricePoint]) {
        let mut content = String::from("Date,Open,High,Low,Close,Volume\n");
        for p in points {
            content.push_str(&format!(
                "{} 00:00:00-05:00,{c},{c},{c},{c},1000\n",
                p.date,
                c = p.close
            ));
        }
        fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
    }

    fn setup() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let data = dir.path().join("prices");
        fs::create_dir(&data).unwrap();
        write_prices(
            &data,
            "ACWI",
            &trading_days(date(2025, 1, 1), 90, |i| 110.0 + (i % 7) as f64),
        );
        write_prices(
            &data,
            "SPY",
            &trading_days(date(2025, 1, 1), 90, |i| 590.0 + i as f64 * 0.5),
        );
        (dir, data)
    }

    #[test]
    fn validate_valid_config_succeeds() {
        let file = write_temp_ini(VALID_INI);
        let code = run(Command::Validate {
            config: file.path().to_path_buf(),
        });
        assert!(same_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn validate_missing_file_is_config_error() {
        let code = run(Command::Validate {
            config: PathBuf::from("/nonexistent/path/config.ini"),
        });
        assert!(same_code(code, ExitCode::from(2)));
    }

    #[test]
    fn validate_bad_weekday_is_config_error() {
        let file = write_temp_ini(
            "[analysis]\nstart_date = 2025-01-01\nend_date = 2025-03-31\nweekday = someday\n",
        );
        let code = run(Command::Validate {
            config: file.path().to_path_buf(),
        });
        assert!(same_code(code, ExitCode::from(2)));
    }

    #[test]
    fn list_symbols_reads_data_dir() {
        let (_dir, data) = setup();
        let code = run(Command::ListSymbols { data_dir: data });
        assert!(same_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn list_symbols_missing_dir_is_data_error() {
        let code = run(Command::ListSymbols {
            data_dir: PathBuf::from("/nonexistent/prices"),
        });
        assert!(same_code(code, ExitCode::from(3)));
    }

    #[test]
    fn analyze_writes_export() {
        let (dir, data) = setup();
        let ini = format!("{VALID_INI}\n[data]\ndir = {}\n", data.display());
        let file = write_temp_ini(&ini);
        let output = dir.path().join("export.csv");

        let code = run(Command::Analyze {
            config: file.path().to_path_buf(),
            data_dir: None,
            output: Some(output.clone()),
        });

        assert!(same_code(code, ExitCode::SUCCESS));
        let content = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "Investment Date,ACWI Price,SPY Price,ACWI Shares Bought,SPY Shares Bought"
        );
        // 13 Thursdays from 2025-01-02 to 2025-03-27
        assert_eq!(lines.len(), 14);
        assert!(lines[1].starts_with("2025-01-02,"));
    }

    #[test]
    fn analyze_data_dir_flag_overrides_config() {
        let (dir, data) = setup();
        let ini = format!("{VALID_INI}\n[data]\ndir = /nonexistent/prices\n");
        let file = write_temp_ini(&ini);
        let output = dir.path().join("override.csv");

        let code = run(Command::Analyze {
            config: file.path().to_path_buf(),
            data_dir: Some(data),
            output: Some(output.clone()),
        });

        assert!(same_code(code, ExitCode::SUCCESS));
        assert!(output.exists());
    }

    #[test]
    fn analyze_without_data_dir_is_config_error() {
        let file = write_temp_ini(VALID_INI);
        let code = run(Command::Analyze {
            config: file.path().to_path_buf(),
            data_dir: None,
            output: None,
        });
        assert!(same_code(code, ExitCode::from(2)));
    }

    #[test]
    fn analyze_missing_symbol_file_is_data_error() {
        let (dir, data) = setup();
        fs::remove_file(data.join("SPY.csv")).unwrap();
        let file = write_temp_ini(VALID_INI);

        let code = run(Command::Analyze {
            config: file.path().to_path_buf(),
            data_dir: Some(data),
            output: Some(dir.path().join("never.csv")),
        });
        assert!(same_code(code, ExitCode::from(3)));
    }

    #[test]
    fn pipeline_with_mock_port() {
        let points = trading_days(date(2025, 1, 1), 181, |i| 100.0 + i as f64 * 0.1);
        let port = MockPriceDataPort::new()
            .with_points("ACWI", points.clone())
            .with_points("SPY", points);
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("mock.csv");

        let code = cli::run_analysis_pipeline(
            &port,
            &CsvExportAdapter,
            &sample_config(),
            Some(&output),
        );

        assert!(same_code(code, ExitCode::SUCCESS));
        assert!(output.exists());
    }
}
