use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use super::Analyzer;
use crate::report::types::{Finding, RiskLevel, SecurityReport};
use crate::source::SourceUnit;

/// Names flagged wherever they appear in the text, including strings and comments.
const DANGEROUS_FUNCTIONS: [&str; 8] = [
    "eval",
    "exec",
    "input",
    "pickle.loads",
    "marshal.loads",
    "os.system",
    "subprocess.call",
    "execfile",
];

lazy_static! {
    static ref SECRET_PATTERNS: Vec<Regex> = [
        r#"(?i)password\s*=\s*["'][^"']+["']"#,
        r#"(?i)api_key\s*=\s*["'][^"']+["']"#,
        r#"(?i)secret\s*=\s*["'][^"']+["']"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("secret pattern is valid"))
    .collect();

    static ref SQL_INJECTION_PATTERNS: Vec<Regex> = [
        r#"\.execute\s*\(\s*f?["'][^"']*%s"#,
        r#"\.execute\s*\(\s*["'][^"']*\+"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("sql pattern is valid"))
    .collect();
}

/// Security Scanner
///
/// Text-only checks; the syntax tree is never consulted, so unparseable
/// files are scanned like any other:
/// - dangerous call names (plain substring search)
/// - hardcoded passwords, API keys and secrets
/// - `.execute(` calls built with `%s` interpolation or `+` concatenation
///
/// Every secret and SQL pattern contributes at most one finding.
pub struct SecurityScanner;

impl SecurityScanner {
    pub fn new() -> Self {
        Self
    }

    pub fn scan(&self, code: &str) -> SecurityReport {
        let mut issues = Vec::new();
        issues.extend(self.check_dangerous_functions(code));
        issues.extend(self.check_hardcoded_secrets(code));
        issues.extend(self.check_sql_injection(code));

        let risk_level = RiskLevel::from_issue_count(issues.len());
        SecurityReport { issues, risk_level }
    }

    fn check_dangerous_functions(&self, code: &str) -> Vec<Finding> {
        DANGEROUS_FUNCTIONS
            .iter()
            .filter(|name| code.contains(*name))
            .map(|name| Finding::new(format!("Use of dangerous function: {name}")))
            .collect()
    }

    fn check_hardcoded_secrets(&self, code: &str) -> Vec<Finding> {
        SECRET_PATTERNS
            .iter()
            .filter(|pattern| pattern.is_match(code))
            .map(|_| Finding::new("Potential hardcoded secret detected"))
            .collect()
    }

    fn check_sql_injection(&self, code: &str) -> Vec<Finding> {
        SQL_INJECTION_PATTERNS
            .iter()
            .filter(|pattern| pattern.is_match(code))
            .map(|_| Finding::new("Potential SQL injection vulnerability"))
            .collect()
    }
}

impl Default for SecurityScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Analyzer for SecurityScanner {
    type Report = SecurityReport;

    fn name(&self) -> &str {
        "Security Scan"
    }

    async fn analyze(&self, unit: &SourceUnit<'_>) -> SecurityReport {
        self.scan(unit.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(report: &SecurityReport) -> Vec<&str> {
        report.issues.iter().map(|f| f.message.as_str()).collect()
    }

    #[test]
    fn test_clean_code_is_low_risk() {
        let report = SecurityScanner::new().scan("def add(a, b):\n    return a + b\n");
        assert!(report.issues.is_empty());
        assert_eq!(report.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_hardcoded_password_is_single_medium_finding() {
        let report = SecurityScanner::new().scan("password = 'abc123'");
        assert_eq!(messages(&report), vec!["Potential hardcoded secret detected"]);
        assert_eq!(report.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_secret_patterns_are_case_insensitive_and_counted_once() {
        let code = "API_KEY = \"k1\"\napi_key = \"k2\"\nSecret=\"s\"\n";
        let report = SecurityScanner::new().scan(code);
        assert_eq!(
            messages(&report),
            vec![
                "Potential hardcoded secret detected",
                "Potential hardcoded secret detected"
            ]
        );
    }

    #[test]
    fn test_empty_secret_literal_is_not_flagged() {
        let report = SecurityScanner::new().scan("password = ''\n");
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_dangerous_substrings_match_anywhere() {
        // "execfile" also contains "exec"; the comment still counts
        let report = SecurityScanner::new().scan("# never call execfile here\n");
        assert_eq!(
            messages(&report),
            vec![
                "Use of dangerous function: exec",
                "Use of dangerous function: execfile"
            ]
        );
        assert_eq!(report.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_sql_injection_patterns() {
        // ".execute(" always trips the "exec" substring as well
        let interpolated = "cursor.execute(\"SELECT * FROM t WHERE id = %s\" % uid)\n";
        let report = SecurityScanner::new().scan(interpolated);
        assert_eq!(
            messages(&report),
            vec![
                "Use of dangerous function: exec",
                "Potential SQL injection vulnerability"
            ]
        );

        let concatenated = "cursor.execute(\"SELECT a+b FROM t\")\n";
        let report = SecurityScanner::new().scan(concatenated);
        assert_eq!(
            messages(&report),
            vec![
                "Use of dangerous function: exec",
                "Potential SQL injection vulnerability"
            ]
        );

        let parameterized = "cursor.execute('SELECT * FROM t WHERE id = ?', (uid,))\n";
        let report = SecurityScanner::new().scan(parameterized);
        assert_eq!(messages(&report), vec!["Use of dangerous function: exec"]);
    }

    #[test]
    fn test_interpolation_and_concatenation_inside_one_literal() {
        let code = "db.execute(f'SELECT %s + 1')\n";
        let report = SecurityScanner::new().scan(code);
        let sql = report
            .issues
            .iter()
            .filter(|f| f.message == "Potential SQL injection vulnerability")
            .count();
        // the second pattern does not allow the f prefix
        assert_eq!(sql, 1);
    }

    #[test]
    fn test_three_issues_is_high_risk() {
        let code = "import os\nos.system(input())\npassword = 'x'\n";
        let report = SecurityScanner::new().scan(code);
        assert_eq!(report.issues.len(), 3);
        assert_eq!(report.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_scan_ignores_parse_failures() {
        let report = SecurityScanner::new().scan("eval(\n");
        assert_eq!(messages(&report), vec!["Use of dangerous function: eval"]);
    }

    #[tokio::test]
    async fn test_analyzer_trait_uses_text() {
        let unit = SourceUnit::parse("secret = 'x'\n");
        let report = SecurityScanner::new().analyze(&unit).await;
        assert_eq!(report.issues.len(), 1);
    }
}
