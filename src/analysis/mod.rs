pub mod metrics;
pub mod performance;
pub mod score;
pub mod security;
pub mod style;

pub use metrics::MetricsAnalyzer;
pub use performance::PerformanceAnalyzer;
pub use score::ScoreAggregator;
pub use security::SecurityScanner;
pub use style::StyleChecker;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info_span, instrument, warn, Instrument};

use crate::config::Config;
use crate::report::types::{AnalysisRecord, FileAnalysis};
use crate::source::SourceUnit;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Could not analyze {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Core trait that every analyzer implements.
/// Analyzers are pure functions of the source unit, so they can run
/// concurrently via tokio::join! without sharing any state.
#[async_trait]
pub trait Analyzer: Send + Sync {
    type Report: Send;

    /// Human-readable name of this analyzer (e.g., "Security Scan")
    fn name(&self) -> &str;

    /// Analyze one parsed file. Never fails: parse failures degrade the report.
    async fn analyze(&self, unit: &SourceUnit<'_>) -> Self::Report;
}

/// Parse `text` once, run all four analyzers concurrently and score the result.
pub async fn run_all(file: &str, text: &str, config: &Config) -> FileAnalysis {
    let unit = SourceUnit::parse(text);

    let metrics = MetricsAnalyzer::new();
    let security = SecurityScanner::new();
    let performance = PerformanceAnalyzer::new();
    let style = StyleChecker::with_max_line_length(config.style.max_line_length);

    let (metrics_report, security_report, performance_report, style_report) = tokio::join!(
        metrics.analyze(&unit).instrument(info_span!("analyze", analyzer = "metrics")),
        security.analyze(&unit).instrument(info_span!("analyze", analyzer = "security")),
        performance.analyze(&unit).instrument(info_span!("analyze", analyzer = "performance")),
        style.analyze(&unit).instrument(info_span!("analyze", analyzer = "style")),
    );

    debug!(
        analyzer = security.name(),
        risk = %security_report.risk_level,
        findings = security_report.issues.len(),
        "analyzer result"
    );
    debug!(
        analyzer = performance.name(),
        findings = performance_report.issues.len(),
        "analyzer result"
    );
    debug!(analyzer = style.name(), findings = style_report.violations.len(), "analyzer result");
    if metrics_report.measured().is_none() {
        debug!(analyzer = metrics.name(), "metrics unavailable, file did not parse");
    }

    let overall_score = ScoreAggregator.score(
        &metrics_report,
        &security_report,
        &performance_report,
        &style_report,
    );

    FileAnalysis {
        file: file.to_string(),
        metrics: metrics_report,
        security: security_report,
        performance: performance_report,
        style: style_report,
        overall_score,
    }
}

/// Read and analyze one file. Unreadable input becomes an error record.
#[instrument(skip(path, config), fields(path = %path.display()))]
pub async fn analyze_file(path: &Path, config: &Config) -> AnalysisRecord {
    match read_source(path).await {
        Ok(text) => {
            let analysis = run_all(&path.display().to_string(), &text, config).await;
            debug!(score = analysis.overall_score, "file analyzed");
            AnalysisRecord::Analyzed(analysis)
        }
        Err(err) => {
            warn!(error = %err, "skipping unreadable file");
            AnalysisRecord::Failed {
                error: err.to_string(),
            }
        }
    }
}

async fn read_source(path: &Path) -> Result<String, AnalysisError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| AnalysisError::Unreadable {
            path: path.to_path_buf(),
            source,
        })
}
