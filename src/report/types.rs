use serde::Serialize;

/// Coarse security classification, derived purely from the number of issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// 0 issues is LOW, 1-2 is MEDIUM, 3 or more is HIGH.
    pub fn from_issue_count(count: usize) -> Self {
        match count {
            0 => RiskLevel::Low,
            1 | 2 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// A single human-readable issue reported by an analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Finding {
    pub message: String,
}

impl Finding {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Size, structure and maintainability figures for one parsed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub line_count: usize,
    pub function_count: usize,
    pub class_count: usize,
    /// Percentage of comment lines, in [0, 100]
    pub comment_ratio: f64,
    /// Always at least 1
    pub cyclomatic_complexity: usize,
    /// Clamped to [0, 100]
    pub maintainability_index: f64,
}

/// Metrics, or the error marker that replaces them when the file does not parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricsReport {
    Measured(Metrics),
    Failed { error: String },
}

impl MetricsReport {
    pub fn measured(&self) -> Option<&Metrics> {
        match self {
            MetricsReport::Measured(metrics) => Some(metrics),
            MetricsReport::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityReport {
    pub issues: Vec<Finding>,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub issues: Vec<Finding>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleReport {
    pub violations: Vec<Finding>,
    /// True iff there are no violations
    pub pep8_compliance: bool,
}

/// Everything derived from one successfully read file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileAnalysis {
    pub file: String,
    pub metrics: MetricsReport,
    pub security: SecurityReport,
    pub performance: PerformanceReport,
    pub style: StyleReport,
    /// Weighted quality score in [0, 100]
    pub overall_score: u8,
}

/// Per-file outcome: fully populated, or an error message and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisRecord {
    Analyzed(FileAnalysis),
    Failed { error: String },
}

impl AnalysisRecord {
    /// Error records score 0.
    pub fn overall_score(&self) -> u8 {
        match self {
            AnalysisRecord::Analyzed(analysis) => analysis.overall_score,
            AnalysisRecord::Failed { .. } => 0,
        }
    }
}

/// Complete report over every analyzed file.
#[derive(Debug, Serialize)]
pub struct Report {
    pub total_files: usize,
    /// Mean overall score across all records, 0 when there are none
    pub average_score: f64,
    pub records: Vec<AnalysisRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn test_risk_level_display() {
        assert_eq!(RiskLevel::Low.to_string(), "LOW");
        assert_eq!(RiskLevel::Medium.to_string(), "MEDIUM");
        assert_eq!(RiskLevel::High.to_string(), "HIGH");
    }

    #[test]
    fn test_risk_level_from_issue_count_boundaries() {
        assert_eq!(RiskLevel::from_issue_count(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_issue_count(1), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_issue_count(2), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_issue_count(3), RiskLevel::High);
        assert_eq!(RiskLevel::from_issue_count(40), RiskLevel::High);
    }

    #[test]
    fn test_error_markers_serialize_flat() {
        let metrics = MetricsReport::Failed {
            error: "Syntax error in code".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&metrics).unwrap(),
            serde_json::json!({ "error": "Syntax error in code" })
        );

        let record = AnalysisRecord::Failed {
            error: "Could not analyze a.py: denied".to_string(),
        };
        assert_eq!(record.overall_score(), 0);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({ "error": "Could not analyze a.py: denied" })
        );
    }

    #[test]
    fn test_security_report_serializes_risk_uppercase() {
        let report = SecurityReport {
            issues: vec![Finding::new("Potential hardcoded secret detected")],
            risk_level: RiskLevel::Medium,
        };
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({
                "issues": ["Potential hardcoded secret detected"],
                "risk_level": "MEDIUM"
            })
        );
    }
}
