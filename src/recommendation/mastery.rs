//! Topic mastery from quiz history
//!
//! Averages quiz scores per topic, attributing each attempt to every topic
//! whose key appears in its course id, and normalizes to a 0-1 scale.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::topics::{Topic, MASTERY_KEYS};

/// Mastery assumed for a topic the learner has no quiz history in
pub const DEFAULT_MASTERY: f64 = 0.5;

/// A single quiz attempt as reported by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub course_id: String,
    /// Percentage score, nominally 0-100
    pub score: f64,
    pub passed: bool,
}

/// Per-topic mastery in [0, 1]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MasteryMap {
    scores: HashMap<Topic, f64>,
}

impl MasteryMap {
    /// Mastery for `topic`, or [`DEFAULT_MASTERY`] when there is no evidence
    pub fn get(&self, topic: Topic) -> f64 {
        self.scores.get(&topic).copied().unwrap_or(DEFAULT_MASTERY)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl FromIterator<(Topic, f64)> for MasteryMap {
    fn from_iter<I: IntoIterator<Item = (Topic, f64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// Build a mastery map from quiz attempts.
///
/// Scores outside 0-100 are not rejected and carry through to out-of-range
/// mastery values.
pub fn estimate_mastery(attempts: &[QuizAttempt]) -> MasteryMap {
    let mut totals: HashMap<Topic, (f64, u32)> = HashMap::new();

    for attempt in attempts {
        let course_id = attempt.course_id.to_lowercase();
        for (key, topic) in MASTERY_KEYS {
            if course_id.contains(key) {
                let entry = totals.entry(topic).or_insert((0.0, 0));
                entry.0 += attempt.score;
                entry.1 += 1;
            }
        }
    }

    totals
        .into_iter()
        .map(|(topic, (sum, count))| (topic, sum / count as f64 / 100.0))
        .collect()
}
