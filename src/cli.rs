//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::csv_export_adapter::CsvExportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{AnalysisConfig, AnalysisResult};
use crate::domain::cash_flow::{self, CashFlow};
use crate::domain::config_validation::{
    parse_date, validate_analysis_config, DEFAULT_AMOUNT, DEFAULT_SYMBOL_A, DEFAULT_SYMBOL_B,
    DEFAULT_WEEKDAY,
};
use crate::domain::error::DcaError;
use crate::domain::pipeline::{run_comparison, ComparisonReport};
use crate::domain::schedule::{self, parse_weekday};
use crate::domain::xirr::XirrSolver;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;
use crate::ports::report_port::ReportPort;

/// Flows shown at each end of the cash-flow listing.
const CASH_FLOW_SUMMARY_EDGE: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "dcavest", about = "Weekly dollar-cost-averaging comparison with XIRR")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate both strategies and compare them
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory holding <SYMBOL>.csv price files (overrides [data] dir)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        /// CSV export path (overrides [report] output)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file and show the schedule it produces
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List instruments with price files in the data directory
    ListSymbols {
        #[arg(short, long)]
        data_dir: PathBuf,
    },
}

/// Install the stderr `tracing` subscriber, filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            data_dir,
            output,
        } => run_analyze(&config, data_dir.as_deref(), output.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { data_dir } => run_list_symbols(&data_dir),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

pub fn build_solver(config: &dyn ConfigPort) -> XirrSolver {
    let defaults = XirrSolver::default();
    let max_iterations =
        config.get_int("xirr", "max_iterations", defaults.max_iterations as i64);
    XirrSolver {
        guess: config.get_double("xirr", "guess", defaults.guess),
        max_iterations: usize::try_from(max_iterations).unwrap_or(defaults.max_iterations),
        tolerance: config.get_double("xirr", "tolerance", defaults.tolerance),
    }
}

pub fn build_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, DcaError> {
    validate_analysis_config(config)?;

    let date = |key: &str| parse_date(config.get_string("analysis", key).as_deref(), key);
    let start_date = date("start_date")?;
    let end_date = date("end_date")?;

    let weekday_str = config
        .get_string("analysis", "weekday")
        .unwrap_or_else(|| DEFAULT_WEEKDAY.to_string());
    let weekday = parse_weekday(&weekday_str).ok_or_else(|| DcaError::ConfigInvalid {
        section: "analysis".into(),
        key: "weekday".into(),
        reason: format!("unknown weekday '{}'", weekday_str),
    })?;

    let symbol = |key: &str, default: &str| {
        config
            .get_string("analysis", key)
            .map(|s| s.trim().to_uppercase())
            .unwrap_or_else(|| default.to_string())
    };

    let analysis = AnalysisConfig {
        start_date,
        end_date,
        amount: config.get_double("analysis", "amount", DEFAULT_AMOUNT),
        weekday,
        symbol_a: symbol("symbol_a", DEFAULT_SYMBOL_A),
        symbol_b: symbol("symbol_b", DEFAULT_SYMBOL_B),
        solver: build_solver(config),
    };
    analysis.validate()?;
    Ok(analysis)
}

fn resolve_data_dir(data_dir: Option<&Path>, config: &dyn ConfigPort) -> Option<PathBuf> {
    data_dir
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("data", "dir").map(PathBuf::from))
}

fn run_analyze(config_path: &Path, data_dir: Option<&Path>, output: Option<&Path>) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let analysis = match build_analysis_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 2: Resolve the price data directory
    let Some(dir) = resolve_data_dir(data_dir, &adapter) else {
        let err = DcaError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        };
        eprintln!("error: {err} (or pass --data-dir)");
        return (&err).into();
    };
    let data_port = CsvPriceAdapter::new(dir);

    // Stages 3-5: Simulate, compare, export
    let output = output
        .map(Path::to_path_buf)
        .or_else(|| adapter.get_string("report", "output").map(PathBuf::from));
    run_analysis_pipeline(&data_port, &CsvExportAdapter, &analysis, output.as_deref())
}

pub fn run_analysis_pipeline(
    data_port: &dyn PriceDataPort,
    report_port: &dyn ReportPort,
    analysis: &AnalysisConfig,
    output_path: Option<&Path>,
) -> ExitCode {
    eprintln!(
        "Analysing {} vs {}: {} every {} from {} to {}",
        analysis.symbol_a,
        analysis.symbol_b,
        format_money(analysis.amount),
        analysis.weekday,
        analysis.start_date,
        analysis.end_date,
    );

    let report = match run_comparison(data_port, analysis) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_summary(&report);

    let output = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CsvExportAdapter::default_file_name(&report)));

    match report_port.write(&report, &output) {
        Ok(()) => {
            eprintln!("\nExport written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write export: {e}");
            (&e).into()
        }
    }
}

fn format_money(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = format!("{:.2}", value.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{frac}")
}

fn print_strategy(result: &AnalysisResult) {
    eprintln!("\n=== {} ===", result.symbol);
    eprintln!("Investments:      {}", result.number_of_investments());
    eprintln!("Total Invested:   {}", format_money(result.total_invested));
    eprintln!("Total Shares:     {:.4}", result.total_shares);
    eprintln!("Avg Cost/Share:   {}", format_money(result.average_cost_per_share));
    eprintln!("Current Price:    {}", format_money(result.current_price));
    eprintln!("Current Value:    {}", format_money(result.current_value));
    eprintln!("Profit:           {}", format_money(result.profit()));
    eprintln!("Total Return:     {:.2}%", result.total_return_pct);
    eprintln!("Price Change:     {:+.2}%", result.price_change_pct);
    eprintln!("XIRR:             {:.2}%", result.xirr * 100.0);
}

fn print_summary(report: &ComparisonReport) {
    print_strategy(&report.a);
    print_strategy(&report.b);

    let cmp = &report.comparison;
    eprintln!("\n=== {} vs {} ===", cmp.symbol_b, cmp.symbol_a);
    eprintln!("Value Difference: {}", format_money(cmp.value_delta));
    eprintln!("Return Diff:      {:+.2} pts", cmp.return_pct_delta);
    eprintln!("XIRR Diff:        {:+.2}%", cmp.rate_delta * 100.0);
    eprintln!("Outperformance:   {:+.2}%", cmp.outperformance_pct);
    eprintln!(
        "Better Strategy:  {} ({})",
        cmp.better_symbol(),
        cmp.better_strategy
    );

    print_cash_flows(&report.a);
}

fn cash_flow_lines(flows: &[CashFlow]) -> Vec<String> {
    cash_flow::summary_rows(flows, CASH_FLOW_SUMMARY_EDGE)
        .into_iter()
        .map(|row| match row {
            Some(flow) => format!(
                "{:<12} {:>16}  {}",
                flow.date.to_string(),
                format_money(flow.amount),
                flow.kind
            ),
            None => format!("{:<12} {:>16}  ...", "...", "..."),
        })
        .collect()
}

fn print_cash_flows(result: &AnalysisResult) {
    eprintln!("\n=== {} Cash Flows ===", result.symbol);
    eprintln!("{:<12} {:>16}  Type", "Date", "Amount");
    for line in cash_flow_lines(&result.cash_flows) {
        eprintln!("{line}");
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let analysis = match build_analysis_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let dates = schedule::generate(analysis.start_date, analysis.end_date, analysis.weekday);

    eprintln!("\nAnalysis:");
    eprintln!("  window:    {} to {}", analysis.start_date, analysis.end_date);
    eprintln!("  amount:    {}", format_money(analysis.amount));
    eprintln!("  weekday:   {}", analysis.weekday);
    eprintln!("  symbols:   {} vs {}", analysis.symbol_a, analysis.symbol_b);
    eprintln!(
        "  xirr:      guess {}, max {} iterations, tolerance {:e}",
        analysis.solver.guess, analysis.solver.max_iterations, analysis.solver.tolerance
    );

    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => {
            eprintln!("\nSchedule: {} purchases, {} to {}", dates.len(), first, last)
        }
        _ => eprintln!("\nSchedule: no {} falls within the window", analysis.weekday),
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_list_symbols(data_dir: &Path) -> ExitCode {
    let adapter = CsvPriceAdapter::new(data_dir.to_path_buf());
    let symbols = match adapter.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No price files found in {}", data_dir.display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}
