use crate::report::types::{MetricsReport, PerformanceReport, SecurityReport, StyleReport};

const SECURITY_PENALTY: i64 = 5;
const PERFORMANCE_PENALTY: i64 = 3;
const STYLE_PENALTY: i64 = 2;
const MAINTAINABILITY_BONUS: i64 = 10;
const MAINTAINABILITY_THRESHOLD: f64 = 80.0;
const COMMENT_BONUS: i64 = 5;
const COMMENT_THRESHOLD: f64 = 20.0;

/// Combines the four reports of one file into a single 0-100 quality score.
///
/// Starts at 100, deducts per finding, adds bonuses for a high maintainability
/// index and comment ratio, then clamps. A file whose metrics carry the
/// parse-error marker scores 0.
pub struct ScoreAggregator;

impl ScoreAggregator {
    pub fn score(
        &self,
        metrics: &MetricsReport,
        security: &SecurityReport,
        performance: &PerformanceReport,
        style: &StyleReport,
    ) -> u8 {
        let Some(metrics) = metrics.measured() else {
            return 0;
        };

        let mut score: i64 = 100;
        score -= SECURITY_PENALTY * security.issues.len() as i64;
        score -= PERFORMANCE_PENALTY * performance.issues.len() as i64;
        score -= STYLE_PENALTY * style.violations.len() as i64;

        if metrics.maintainability_index > MAINTAINABILITY_THRESHOLD {
            score += MAINTAINABILITY_BONUS;
        }
        if metrics.comment_ratio > COMMENT_THRESHOLD {
            score += COMMENT_BONUS;
        }

        score.clamp(0, 100) as u8
    }
}
