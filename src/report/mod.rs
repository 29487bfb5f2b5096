pub mod types;

pub use types::{AnalysisRecord, FileAnalysis, MetricsReport, Report, RiskLevel};

use clap::ValueEnum;
use colored::Colorize;
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::ReportConfig;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to encode report as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// File format used when the report is written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Markdown,
    Json,
}

/// Build a Report from per-file records.
/// The average counts error records as 0 and is 0 when there are no records.
pub fn build(records: Vec<AnalysisRecord>) -> Report {
    let total_files = records.len();
    let average_score = if total_files == 0 {
        0.0
    } else {
        let total: u64 = records.iter().map(|r| u64::from(r.overall_score())).sum();
        total as f64 / total_files as f64
    };

    Report {
        total_files,
        average_score,
        records,
    }
}

/// Output the report to terminal (default) or to a file in the given format.
#[instrument(skip(report, settings), fields(files = report.total_files))]
pub fn output(
    report: &Report,
    output_path: Option<&Path>,
    format: ReportFormat,
    settings: &ReportConfig,
) -> Result<(), ReportError> {
    match output_path {
        None => {
            debug!("writing report to terminal");
            print_terminal_report(report, settings);
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), ?format, "writing report to file");
            let contents = match format {
                ReportFormat::Markdown => render_markdown(report, settings),
                ReportFormat::Json => serde_json::to_string_pretty(report)?,
            };
            std::fs::write(path, contents)?;
            Ok(())
        }
    }
}

/// Format and print the report to the terminal with colors.
///
/// ═══ Code Analysis Report ═══
/// Files analyzed: 2 | Average score: 87.5/100
///
/// ─── src/app.py ───
/// Overall Score: 90/100
/// ...
fn print_terminal_report(report: &Report, settings: &ReportConfig) {
    println!();
    println!("═══ {} ═══", "Code Analysis Report".bold());
    println!(
        "Files analyzed: {} | Average score: {:.1}/100",
        report.total_files, report.average_score
    );
    if report.records.is_empty() {
        println!("  No Python files found.");
    }
    println!();

    for record in &report.records {
        let analysis = match record {
            AnalysisRecord::Failed { error } => {
                println!("{} {}", "✗".red().bold(), error);
                println!();
                continue;
            }
            AnalysisRecord::Analyzed(analysis) => analysis,
        };

        println!("─── {} ───", analysis.file.bold());
        println!(
            "Overall Score: {}/100",
            colorize_score(analysis.overall_score)
        );
        match &analysis.metrics {
            MetricsReport::Measured(m) => {
                println!("  Lines: {}", m.line_count);
                println!("  Functions: {}", m.function_count);
                println!("  Classes: {}", m.class_count);
                println!("  Comments: {:.1}%", m.comment_ratio);
                println!("  Complexity: {}", m.cyclomatic_complexity);
                println!("  Maintainability: {:.1}", m.maintainability_index);
            }
            MetricsReport::Failed { error } => {
                println!("  Metrics: {}", error.red());
            }
        }
        println!(
            "  Security: {} issues ({} risk)",
            analysis.security.issues.len(),
            colorize_risk(analysis.security.risk_level)
        );
        println!("  Performance: {} issues", analysis.performance.issues.len());
        println!("  Style: {} violations", analysis.style.violations.len());

        for issue in &analysis.security.issues {
            println!("    • {}", issue.message.red());
        }
        for issue in &analysis.performance.issues {
            println!("    • {}", issue.message.yellow());
        }
        for violation in analysis
            .style
            .violations
            .iter()
            .take(settings.max_style_violations)
        {
            println!("    • {}", violation.message);
        }
        println!();
    }
}

/// Render the report as markdown.
///
/// # Code Analysis Report
/// **Files analyzed:** 2 | **Average score:** 87.5/100
///
/// ## src/app.py
/// **Overall Score: 90/100**
/// | Metric | Value |
/// ...
fn render_markdown(report: &Report, settings: &ReportConfig) -> String {
    let mut md = String::new();
    md.push_str("# Code Analysis Report\n\n");
    let _ = writeln!(
        md,
        "**Files analyzed:** {} | **Average score:** {:.1}/100\n",
        report.total_files, report.average_score
    );
    if report.records.is_empty() {
        md.push_str("No Python files found.\n");
    }

    for record in &report.records {
        let analysis = match record {
            AnalysisRecord::Failed { error } => {
                let _ = writeln!(md, "> **Error:** {}\n", error);
                continue;
            }
            AnalysisRecord::Analyzed(analysis) => analysis,
        };

        let _ = writeln!(md, "## `{}`\n", analysis.file);
        let _ = writeln!(md, "**Overall Score: {}/100**\n", analysis.overall_score);

        md.push_str("| Metric | Value |\n|---|---|\n");
        match &analysis.metrics {
            MetricsReport::Measured(m) => {
                let _ = writeln!(md, "| Lines | {} |", m.line_count);
                let _ = writeln!(md, "| Functions | {} |", m.function_count);
                let _ = writeln!(md, "| Classes | {} |", m.class_count);
                let _ = writeln!(md, "| Comments | {:.1}% |", m.comment_ratio);
                let _ = writeln!(md, "| Complexity | {} |", m.cyclomatic_complexity);
                let _ = writeln!(md, "| Maintainability | {:.1} |", m.maintainability_index);
            }
            MetricsReport::Failed { error } => {
                let _ = writeln!(md, "| Metrics | {} |", error);
            }
        }
        let _ = writeln!(
            md,
            "| Security | {} issues ({} risk) |",
            analysis.security.issues.len(),
            analysis.security.risk_level
        );
        let _ = writeln!(md, "| Performance | {} issues |", analysis.performance.issues.len());
        let _ = writeln!(md, "| Style | {} violations |\n", analysis.style.violations.len());

        for issue in &analysis.security.issues {
            let _ = writeln!(md, "- **[security]** {}", issue);
        }
        for issue in &analysis.performance.issues {
            let _ = writeln!(md, "- **[performance]** {}", issue);
        }
        for violation in analysis
            .style
            .violations
            .iter()
            .take(settings.max_style_violations)
        {
            let _ = writeln!(md, "- **[style]** {}", violation);
        }
        md.push('\n');
    }

    md
}

/// Helper to colorize a risk level string for terminal output.
fn colorize_risk(level: RiskLevel) -> colored::ColoredString {
    match level {
        RiskLevel::High => "HIGH".red().bold(),
        RiskLevel::Medium => "MEDIUM".yellow().bold(),
        RiskLevel::Low => "LOW".green().bold(),
    }
}

fn colorize_score(score: u8) -> colored::ColoredString {
    let text = score.to_string();
    match score {
        80..=100 => text.green().bold(),
        50..=79 => text.yellow().bold(),
        _ => text.red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::{
        Finding, Metrics, PerformanceReport, SecurityReport, StyleReport,
    };

    fn sample_analysis(file: &str, score: u8) -> FileAnalysis {
        FileAnalysis {
            file: file.to_string(),
            metrics: MetricsReport::Measured(Metrics {
                line_count: 12,
                function_count: 2,
                class_count: 1,
                comment_ratio: 25.0,
                cyclomatic_complexity: 3,
                maintainability_index: 100.0,
            }),
            security: SecurityReport {
                issues: vec![Finding::new("Potential hardcoded secret detected")],
                risk_level: RiskLevel::Medium,
            },
            performance: PerformanceReport {
                issues: vec![Finding::new("Unused import: os")],
            },
            style: StyleReport {
                violations: (1..=5)
                    .map(|i| Finding::new(format!("Line {i}: Trailing whitespace")))
                    .collect(),
                pep8_compliance: false,
            },
            overall_score: score,
        }
    }

    #[test]
    fn test_build_report_average() {
        let report = build(vec![
            AnalysisRecord::Analyzed(sample_analysis("a.py", 90)),
            AnalysisRecord::Analyzed(sample_analysis("b.py", 70)),
            AnalysisRecord::Failed {
                error: "Could not analyze c.py: denied".to_string(),
            },
        ]);
        assert_eq!(report.total_files, 3);
        assert!((report.average_score - 160.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_report_no_records() {
        let report = build(vec![]);
        assert_eq!(report.total_files, 0);
        assert_eq!(report.average_score, 0.0);
    }

    #[test]
    fn test_render_markdown_report() {
        let report = build(vec![
            AnalysisRecord::Analyzed(sample_analysis("src/app.py", 88)),
            AnalysisRecord::Failed {
                error: "Could not analyze bad.py: denied".to_string(),
            },
        ]);
        let md = render_markdown(&report, &ReportConfig::default());

        assert!(md.contains("# Code Analysis Report"));
        assert!(md.contains("**Average score:** 44.0/100"));
        assert!(md.contains("## `src/app.py`"));
        assert!(md.contains("**Overall Score: 88/100**"));
        assert!(md.contains("| Security | 1 issues (MEDIUM risk) |"));
        assert!(md.contains("- **[performance]** Unused import: os"));
        assert!(md.contains("Could not analyze bad.py: denied"));
        // only the first three style violations are listed
        assert!(md.contains("Line 3: Trailing whitespace"));
        assert!(!md.contains("Line 4: Trailing whitespace"));
    }

    #[test]
    fn test_render_markdown_parse_failure() {
        let mut analysis = sample_analysis("broken.py", 0);
        analysis.metrics = MetricsReport::Failed {
            error: "Syntax error in code".to_string(),
        };
        let report = build(vec![AnalysisRecord::Analyzed(analysis)]);
        let md = render_markdown(&report, &ReportConfig::default());
        assert!(md.contains("| Metrics | Syntax error in code |"));
    }

    #[test]
    fn test_output_markdown_to_file() {
        let report = build(vec![AnalysisRecord::Analyzed(sample_analysis("a.py", 90))]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        output(&report, Some(&path), ReportFormat::Markdown, &ReportConfig::default()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Code Analysis Report"));
    }

    #[test]
    fn test_output_json_to_file() {
        let report = build(vec![AnalysisRecord::Analyzed(sample_analysis("a.py", 90))]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        output(&report, Some(&path), ReportFormat::Json, &ReportConfig::default()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_files"], 1);
        assert_eq!(value["records"][0]["file"], "a.py");
        assert_eq!(value["records"][0]["security"]["risk_level"], "MEDIUM");
        assert_eq!(value["records"][0]["metrics"]["line_count"], 12);
        assert_eq!(value["records"][0]["style"]["pep8_compliance"], false);
    }

    #[test]
    fn test_output_to_unwritable_path_fails() {
        let report = build(vec![]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("report.md");
        let result = output(&report, Some(&path), ReportFormat::Markdown, &ReportConfig::default());
        assert!(matches!(result, Err(ReportError::FileWrite(_))));
    }

    #[test]
    fn test_output_to_terminal() {
        let report = build(vec![
            AnalysisRecord::Analyzed(sample_analysis("a.py", 40)),
            AnalysisRecord::Failed {
                error: "Could not analyze b.py: denied".to_string(),
            },
        ]);
        // Should not panic
        output(&report, None, ReportFormat::Markdown, &ReportConfig::default()).unwrap();
    }
}
