use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use super::Analyzer;
use crate::report::types::{Finding, StyleReport};
use crate::source::{split_lines, SourceUnit};

pub const DEFAULT_MAX_LINE_LENGTH: usize = 79;

lazy_static! {
    /// Two or more blanks before a comparison or assignment character.
    /// Heuristic: no tokenizer, so string contents and alignment match too.
    static ref OPERATOR_SPACING: Regex =
        Regex::new(r"[^=!<>]\s\s+[=!<>]").expect("operator pattern is valid");
    static ref FUNCTION_DEF: Regex =
        Regex::new(r"def[ \t]+(\w+)").expect("def pattern is valid");
    static ref SNAKE_CASE: Regex =
        Regex::new(r"^[a-z_][a-z0-9_]*$").expect("snake_case pattern is valid");
}

/// Style Checker
///
/// Line-oriented formatting checks plus function naming, all on raw text:
/// - line length (79 characters unless configured otherwise)
/// - trailing whitespace
/// - runs of spaces in front of `=`, `!`, `<`, `>`
/// - `def` names that are not snake_case
pub struct StyleChecker {
    max_line_length: usize,
}

impl StyleChecker {
    pub fn new() -> Self {
        Self::with_max_line_length(DEFAULT_MAX_LINE_LENGTH)
    }

    pub fn with_max_line_length(max_line_length: usize) -> Self {
        Self { max_line_length }
    }

    pub fn check_style(&self, code: &str) -> StyleReport {
        let mut violations = self.check_lines(code);
        violations.extend(self.check_function_names(code));

        let pep8_compliance = violations.is_empty();
        StyleReport {
            violations,
            pep8_compliance,
        }
    }

    fn check_lines(&self, code: &str) -> Vec<Finding> {
        let mut violations = Vec::new();
        for (i, line) in split_lines(code).into_iter().enumerate() {
            let line_no = i + 1;

            let length = line.chars().count();
            if length > self.max_line_length {
                violations.push(Finding::new(format!(
                    "Line {line_no}: Line too long ({length} > {} characters)",
                    self.max_line_length
                )));
            }

            if line.trim_end() != line {
                violations.push(Finding::new(format!("Line {line_no}: Trailing whitespace")));
            }

            if OPERATOR_SPACING.is_match(line) {
                violations.push(Finding::new(format!(
                    "Line {line_no}: Multiple spaces around operator"
                )));
            }
        }
        violations
    }

    fn check_function_names(&self, code: &str) -> Vec<Finding> {
        FUNCTION_DEF
            .captures_iter(code)
            .filter_map(|caps| caps.get(1))
            .map(|name| name.as_str())
            .filter(|name| !SNAKE_CASE.is_match(name))
            .map(|name| Finding::new(format!("Function '{name}' should be snake_case")))
            .collect()
    }
}

impl Default for StyleChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Analyzer for StyleChecker {
    type Report = StyleReport;

    fn name(&self) -> &str {
        "Style Check"
    }

    async fn analyze(&self, unit: &SourceUnit<'_>) -> StyleReport {
        self.check_style(unit.text())
    }
}
