use async_trait::async_trait;

use super::Analyzer;
use crate::report::types::{Metrics, MetricsReport};
use crate::source::{split_lines, Node, NodeKind, SourceUnit};

/// Code Metrics Analyzer
///
/// Derives size and structure figures from the text and tree of one file:
/// - line, function and class counts
/// - share of comment lines
/// - cyclomatic complexity (branch and loop constructs, no boolean operators)
/// - a simplified maintainability index
///
/// A file that fails to parse gets an error marker instead of partial metrics.
pub struct MetricsAnalyzer;

impl MetricsAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Parse `code` and measure it.
    pub fn analyze_text(&self, code: &str) -> MetricsReport {
        self.measure(&SourceUnit::parse(code))
    }

    pub fn measure(&self, unit: &SourceUnit<'_>) -> MetricsReport {
        let tree = match unit.tree() {
            Ok(tree) => tree,
            Err(err) => {
                return MetricsReport::Failed {
                    error: err.to_string(),
                }
            }
        };
        let text = unit.text();

        let line_count = count_lines(text);
        let comment_ratio = comment_ratio(text);
        let cyclomatic_complexity = cyclomatic_complexity(tree);

        MetricsReport::Measured(Metrics {
            line_count,
            function_count: count_functions(tree),
            class_count: count_classes(tree),
            comment_ratio,
            cyclomatic_complexity,
            maintainability_index: maintainability_index(
                line_count,
                cyclomatic_complexity,
                comment_ratio,
            ),
        })
    }
}

impl Default for MetricsAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn count_lines(text: &str) -> usize {
    split_lines(text).len()
}

/// Plain `def` at any depth; `async def` is not counted.
pub fn count_functions(tree: &Node) -> usize {
    tree.walk()
        .filter(|n| {
            matches!(
                n.kind,
                NodeKind::FunctionDef {
                    is_async: false,
                    ..
                }
            )
        })
        .count()
}

pub fn count_classes(tree: &Node) -> usize {
    tree.walk()
        .filter(|n| matches!(n.kind, NodeKind::ClassDef { .. }))
        .count()
}

/// Percentage of lines whose first non-blank character is `#`; 0 for empty text.
pub fn comment_ratio(text: &str) -> f64 {
    let lines = split_lines(text);
    if lines.is_empty() {
        return 0.0;
    }
    let comment_lines = lines
        .iter()
        .filter(|line| line.trim().starts_with('#'))
        .count();
    comment_lines as f64 / lines.len() as f64 * 100.0
}

/// 1 plus one per `if`, loop (`for`, `async for`, `while`), `try` and `with` / `async with`.
pub fn cyclomatic_complexity(tree: &Node) -> usize {
    1 + tree
        .walk()
        .filter(|n| {
            matches!(
                n.kind,
                NodeKind::Conditional | NodeKind::Loop(_) | NodeKind::Try | NodeKind::With { .. }
            )
        })
        .count()
}

/// `171 - 5.2 ln(complexity) - 0.23 lines + 0.99 comment_ratio`, clamped to [0, 100].
/// Empty text scores 100.
pub fn maintainability_index(line_count: usize, complexity: usize, comment_ratio: f64) -> f64 {
    if line_count == 0 {
        return 100.0;
    }
    let complexity = complexity.max(1) as f64;
    let mi = 171.0 - 5.2 * complexity.ln() - 0.23 * line_count as f64 + 0.99 * comment_ratio;
    mi.clamp(0.0, 100.0)
}

#[async_trait]
impl Analyzer for MetricsAnalyzer {
    type Report = MetricsReport;

    fn name(&self) -> &str {
        "Code Metrics"
    }

    async fn analyze(&self, unit: &SourceUnit<'_>) -> MetricsReport {
        self.measure(unit)
    }
}
