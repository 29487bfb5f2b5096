use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use code_analyzer::report::ReportFormat;
use code_analyzer::{analysis, config, discover, report};

/// Code Analyzer: scores Python source files and reports security,
/// performance and style findings.
#[derive(Parser, Debug)]
#[command(name = "code-analyzer", version, about)]
struct Cli {
    /// Path to a Python file or a directory to scan recursively
    path: PathBuf,

    /// Optional output file for the report (printed to the terminal otherwise)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Format of the file written with --output
    #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
    format: ReportFormat,

    /// Configuration file (defaults to .code-analyzer.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let _main_span = info_span!("code_analyze", path = %cli.path.display()).entered();

    info!("loading configuration");
    let config = config::Config::load(cli.config.as_deref())?;
    debug!(?config, "configuration loaded");

    let files = match discover::collect_python_files(&cli.path, &config.discovery.exclude) {
        Ok(files) => files,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            std::process::exit(1);
        }
    };
    info!(files = files.len(), "found Python files to analyze");

    let mut records = Vec::with_capacity(files.len());
    for path in &files {
        info!(path = %path.display(), "analyzing");
        records.push(analysis::analyze_file(path, &config).await);
    }

    info!("generating report");
    let built_report = report::build(records);
    report::output(&built_report, cli.output.as_deref(), cli.format, &config.report)?;
    info!(average_score = built_report.average_score, "done");

    Ok(())
}
