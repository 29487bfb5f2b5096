use std::collections::HashSet;

use async_trait::async_trait;
use tracing::debug;

use super::Analyzer;
use crate::report::types::{Finding, PerformanceReport};
use crate::source::{LoopKind, Node, NodeKind, SourceUnit};

/// Substrings that mark a call as expensive, checked in this order.
const EXPENSIVE_CALLS: [&str; 3] = ["re.compile", "sorted(", "list.sort("];

/// Performance Analyzer
///
/// Tree-based checks, all skipped when the file does not parse:
/// - `for` / `while` loops with another such loop as a direct child
/// - calls whose source text contains a known expensive operation
/// - imported names never referenced anywhere in the module
pub struct PerformanceAnalyzer;

impl PerformanceAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Parse `code` and check it.
    pub fn check(&self, code: &str) -> PerformanceReport {
        self.inspect(&SourceUnit::parse(code))
    }

    pub fn inspect(&self, unit: &SourceUnit<'_>) -> PerformanceReport {
        let Ok(tree) = unit.tree() else {
            debug!("no tree available, skipping performance checks");
            return PerformanceReport::default();
        };

        let mut issues = Vec::new();
        issues.extend(self.find_nested_loops(tree));
        issues.extend(self.find_expensive_operations(tree, unit.text()));
        issues.extend(self.find_unused_imports(tree));
        PerformanceReport { issues }
    }

    /// One finding per outer loop. Only direct children are inspected, so a
    /// loop reached through an intermediate `if` or `with` is not reported.
    fn find_nested_loops(&self, tree: &Node) -> Vec<Finding> {
        tree.walk()
            .filter(|node| is_sync_loop(node))
            .filter(|node| node.children().iter().any(is_sync_loop))
            .map(|_| Finding::new("Nested loops detected - consider optimization"))
            .collect()
    }

    fn find_expensive_operations(&self, tree: &Node, text: &str) -> Vec<Finding> {
        let mut findings = Vec::new();
        for call in tree.walk().filter(|n| n.kind == NodeKind::Call) {
            let Some(call_text) = call.text(text) else {
                continue;
            };
            if let Some(expensive) = EXPENSIVE_CALLS.iter().find(|e| call_text.contains(*e)) {
                findings.push(Finding::new(format!(
                    "Expensive operation '{expensive}' found"
                )));
            }
        }
        findings
    }

    /// Compares bound import names against every identifier reference.
    /// Uses inside strings or `__all__` are not seen.
    fn find_unused_imports(&self, tree: &Node) -> Vec<Finding> {
        let mut imported: Vec<&str> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut used: HashSet<&str> = HashSet::new();

        for node in tree.walk() {
            match &node.kind {
                NodeKind::Import { names } | NodeKind::ImportFrom { names } => {
                    for name in names {
                        if seen.insert(name.as_str()) {
                            imported.push(name.as_str());
                        }
                    }
                }
                NodeKind::Identifier(name) => {
                    used.insert(name.as_str());
                }
                _ => {}
            }
        }

        imported
            .into_iter()
            .filter(|name| !used.contains(name))
            .map(|name| Finding::new(format!("Unused import: {name}")))
            .collect()
    }
}

impl Default for PerformanceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_sync_loop(node: &Node) -> bool {
    matches!(node.kind, NodeKind::Loop(LoopKind::For | LoopKind::While))
}

#[async_trait]
impl Analyzer for PerformanceAnalyzer {
    type Report = PerformanceReport;

    fn name(&self) -> &str {
        "Performance Check"
    }

    async fn analyze(&self, unit: &SourceUnit<'_>) -> PerformanceReport {
        self.inspect(unit)
    }
}
