//! Recommendation Metrics and Performance Monitoring
//!
//! Per-request accounting of a ranking pass, plus a timing guard for the
//! scoring loop. Published through the `metrics` facade by the API layer.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Metrics for a single recommendation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationMetrics {
    pub user_id: String,
    pub request_id: String,
    pub timestamp: i64,

    // Performance
    pub scoring_duration_us: u64,

    // Funnel
    pub candidates_considered: usize,
    pub skipped_enrolled: usize,
    pub below_threshold: usize,
    pub recommendations_returned: usize,

    // Quality
    pub avg_score: f64,
    pub unique_topics: usize,
    pub mastered_topics: usize,
}

impl Default for RecommendationMetrics {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            request_id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            scoring_duration_us: 0,
            candidates_considered: 0,
            skipped_enrolled: 0,
            below_threshold: 0,
            recommendations_returned: 0,
            avg_score: 0.0,
            unique_topics: 0,
            mastered_topics: 0,
        }
    }
}

impl RecommendationMetrics {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            ..Default::default()
        }
    }

    /// Push the counters of this pass to the installed metrics recorder
    pub fn publish(&self) {
        metrics::counter!("recommendations_served_total").increment(1);
        metrics::histogram!("recommendation_courses_returned")
            .record(self.recommendations_returned as f64);
        metrics::histogram!("recommendation_scoring_duration_us")
            .record(self.scoring_duration_us as f64);
        if self.recommendations_returned == 0 {
            metrics::counter!("recommendations_empty_total").increment(1);
        }
    }
}

/// Performance timer for tracking operation duration
pub struct PerformanceTimer {
    start: Instant,
    label: &'static str,
}

impl PerformanceTimer {
    pub fn new(label: &'static str) -> Self {
        Self {
            start: Instant::now(),
            label,
        }
    }

    pub fn elapsed_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    pub fn log_if_slow(&self, threshold_us: u64) {
        let elapsed = self.elapsed_us();
        if elapsed > threshold_us {
            tracing::warn!(
                "⚠️ Slow operation: {} took {}µs (threshold: {}µs)",
                self.label,
                elapsed,
                threshold_us
            );
        }
    }
}

impl Drop for PerformanceTimer {
    fn drop(&mut self) {
        tracing::debug!("⏱️ {} completed in {}µs", self.label, self.elapsed_us());
    }
}
