//! Difficulty estimation
//!
//! Buckets a learner's average score and completion rate into a difficulty
//! label. Missing statistics fall back to defaults instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

pub const DEFAULT_AVG_SCORE: f64 = 75.0;
pub const DEFAULT_COMPLETION_RATE: f64 = 0.5;

const BEGINNER_CEILING: f64 = 0.33;
const INTERMEDIATE_CEILING: f64 = 0.67;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyRequest {
    pub course_id: String,
    /// Free-form statistics; only numeric `avgScore` and `completionRate` are read
    pub user_stats: HashMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    /// Fixed confidence reported with each bucket
    pub fn confidence(&self) -> f64 {
        match self {
            DifficultyLevel::Beginner => 0.85,
            DifficultyLevel::Intermediate => 0.80,
            DifficultyLevel::Advanced => 0.75,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "Beginner",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Advanced => "Advanced",
        }
    }

    fn from_overall(overall: f64) -> Self {
        if overall < BEGINNER_CEILING {
            DifficultyLevel::Beginner
        } else if overall < INTERMEDIATE_CEILING {
            DifficultyLevel::Intermediate
        } else {
            DifficultyLevel::Advanced
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyEstimate {
    pub estimated_difficulty: DifficultyLevel,
    pub confidence: f64,
}

/// Combined mismatch signal: low scores and low completion both raise it
pub fn overall_score(avg_score: f64, completion_rate: f64) -> f64 {
    let difficulty_score = (100.0 - avg_score) / 100.0;
    (difficulty_score + (1.0 - completion_rate)) / 2.0
}

pub fn estimate(avg_score: f64, completion_rate: f64) -> DifficultyEstimate {
    let level = DifficultyLevel::from_overall(overall_score(avg_score, completion_rate));
    DifficultyEstimate {
        estimated_difficulty: level,
        confidence: level.confidence(),
    }
}

/// Estimate from a statistics map, defaulting absent or non-numeric fields
pub fn estimate_from_stats(stats: &HashMap<String, Value>) -> DifficultyEstimate {
    let avg_score = numeric_stat(stats, "avgScore").unwrap_or(DEFAULT_AVG_SCORE);
    let completion_rate =
        numeric_stat(stats, "completionRate").unwrap_or(DEFAULT_COMPLETION_RATE);
    estimate(avg_score, completion_rate)
}

fn numeric_stat(stats: &HashMap<String, Value>, key: &str) -> Option<f64> {
    stats.get(key).and_then(Value::as_f64)
}
