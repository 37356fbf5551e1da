//! Recommendation Engine
//!
//! Scores every catalog course for a learner, keeps the ones above the
//! threshold and returns them best first together with their topics.
//! Stateless: each call works only on its arguments and the random source.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

use super::mastery::{estimate_mastery, MasteryMap, QuizAttempt};
use super::metrics::{PerformanceTimer, RecommendationMetrics};
use super::random::RandomSource;
use super::topics::{CatalogEntry, Topic, COURSE_CATALOG};
use crate::config::RecommendationConfig;

/// Learner state submitted for ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub user_id: String,
    pub enrolled_courses: Vec<String>,
    /// Accepted for logging, not used in scoring
    pub completed_modules: Vec<String>,
    pub quiz_attempts: Vec<QuizAttempt>,
}

/// A scored recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedCourse {
    pub course_id: String,
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    /// Best first
    pub recommended_courses: Vec<RecommendedCourse>,
    /// Distinct topics of the recommended courses
    pub recommended_topics: Vec<Topic>,
}

/// Recommendation weights
#[derive(Debug, Clone)]
pub struct ScoringWeights {
    pub weakness: f64,
    pub engagement: f64,
    pub saturation: f64,
    pub popularity: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            weakness: 0.45,   // favour topics the learner is weak in
            engagement: 0.25,
            saturation: 0.15, // back off as enrollments pile up
            popularity: 0.15,
        }
    }
}

/// Sampling ranges and baselines for the randomized terms
pub const POPULARITY_RANGE: (f64, f64) = (0.7, 1.0);
pub const ENGAGEMENT_JITTER: (f64, f64) = (-0.1, 0.1);
pub const ENGAGEMENT_BASELINE: f64 = 0.5;
/// Enrollment count at which the saturation term reaches zero
pub const SATURATION_ENROLLMENTS: f64 = 10.0;

/// Scoring above this duration is logged as slow
const SLOW_SCORING_US: u64 = 5_000;

/// Threshold and result bounds
#[derive(Debug, Clone)]
pub struct RankingLimits {
    /// Candidates must score strictly above this
    pub min_score: f64,
    pub max_courses: usize,
    pub max_topics: usize,
}

impl Default for RankingLimits {
    fn default() -> Self {
        Self {
            min_score: 0.3,
            max_courses: 8,
            max_topics: 5,
        }
    }
}

impl From<&RecommendationConfig> for RankingLimits {
    fn from(config: &RecommendationConfig) -> Self {
        Self {
            min_score: config.min_score,
            max_courses: config.max_courses,
            max_topics: config.max_topics,
        }
    }
}

/// Main recommendation engine
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    weights: ScoringWeights,
    limits: RankingLimits,
    catalog: &'static [CatalogEntry],
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(RankingLimits::default())
    }
}

impl RecommendationEngine {
    pub fn new(limits: RankingLimits) -> Self {
        Self {
            weights: ScoringWeights::default(),
            limits,
            catalog: &COURSE_CATALOG,
        }
    }

    pub fn with_weights(limits: RankingLimits, weights: ScoringWeights) -> Self {
        Self {
            weights,
            limits,
            catalog: &COURSE_CATALOG,
        }
    }

    /// Rank catalog courses for a learner
    pub fn recommend<R: RandomSource + ?Sized>(
        &self,
        request: &RecommendationRequest,
        rng: &mut R,
    ) -> RecommendationResponse {
        self.recommend_with_metrics(request, rng).0
    }

    /// Rank catalog courses and report how the candidates fared
    pub fn recommend_with_metrics<R: RandomSource + ?Sized>(
        &self,
        request: &RecommendationRequest,
        rng: &mut R,
    ) -> (RecommendationResponse, RecommendationMetrics) {
        let timer = PerformanceTimer::new("recommendation_scoring");
        let mut metrics = RecommendationMetrics::for_user(&request.user_id);

        let mastery = estimate_mastery(&request.quiz_attempts);
        metrics.mastered_topics = mastery.len();

        let mut kept: Vec<(RecommendedCourse, Topic)> = Vec::with_capacity(self.catalog.len());

        for entry in self.catalog {
            metrics.candidates_considered += 1;
            let course_id = entry.course_id();
            let score = self.score_candidate(
                &mastery,
                &course_id,
                entry.topic,
                &request.enrolled_courses,
                rng,
            );

            if request.enrolled_courses.contains(&course_id) {
                metrics.skipped_enrolled += 1;
                continue;
            }
            if score <= self.limits.min_score {
                metrics.below_threshold += 1;
                continue;
            }

            kept.push((
                RecommendedCourse {
                    course_id,
                    score,
                    reason: entry.reason.to_string(),
                },
                entry.topic,
            ));
        }

        // Stable: ties keep catalog order
        kept.sort_by(|a, b| b.0.score.partial_cmp(&a.0.score).unwrap_or(Ordering::Equal));

        kept.truncate(self.limits.max_courses);

        // Topics only name courses that made the cut
        let recommended_topics = Self::distinct_topics(
            kept.iter().map(|(_, topic)| *topic),
            self.limits.max_topics,
        );

        let recommended_courses: Vec<RecommendedCourse> =
            kept.into_iter().map(|(course, _)| course).collect();

        metrics.recommendations_returned = recommended_courses.len();
        metrics.unique_topics = recommended_topics.len();
        if !recommended_courses.is_empty() {
            metrics.avg_score = recommended_courses.iter().map(|c| c.score).sum::<f64>()
                / recommended_courses.len() as f64;
        }
        metrics.scoring_duration_us = timer.elapsed_us();
        timer.log_if_slow(SLOW_SCORING_US);

        debug!(
            "Ranked {} courses for user {} ({} enrolled skipped, {} below threshold)",
            metrics.recommendations_returned,
            request.user_id,
            metrics.skipped_enrolled,
            metrics.below_threshold
        );

        (
            RecommendationResponse {
                recommended_courses,
                recommended_topics,
            },
            metrics,
        )
    }

    /// Desirability of one candidate course in [0, 1].
    ///
    /// Enrolled courses score exactly 0.0 and consume no random draws.
    /// Otherwise popularity is drawn first, then engagement jitter.
    pub fn score_candidate<R: RandomSource + ?Sized>(
        &self,
        mastery: &MasteryMap,
        course_id: &str,
        topic: Topic,
        enrolled_courses: &[String],
        rng: &mut R,
    ) -> f64 {
        if enrolled_courses.iter().any(|c| c == course_id) {
            return 0.0;
        }

        let weakness = 1.0 - mastery.get(topic);
        let popularity = rng.uniform(POPULARITY_RANGE.0, POPULARITY_RANGE.1);
        let engagement = ENGAGEMENT_BASELINE + rng.uniform(ENGAGEMENT_JITTER.0, ENGAGEMENT_JITTER.1);
        // Goes negative past SATURATION_ENROLLMENTS; only the total is clamped
        let saturation = 1.0 - enrolled_courses.len() as f64 / SATURATION_ENROLLMENTS;

        let w = &self.weights;
        let score = w.weakness * weakness
            + w.engagement * engagement
            + w.saturation * saturation
            + w.popularity * popularity;

        score.clamp(0.0, 1.0)
    }

    /// First-seen distinct topics, at most `limit`
    fn distinct_topics(topics: impl Iterator<Item = Topic>, limit: usize) -> Vec<Topic> {
        let mut seen = HashSet::new();
        topics.filter(|t| seen.insert(*t)).take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Always returns the middle of the requested range
    struct Midpoint;

    impl RandomSource for Midpoint {
        fn uniform(&mut self, low: f64, high: f64) -> f64 {
            (low + high) / 2.0
        }
    }

    /// Replays fixed values regardless of range
    struct Scripted(VecDeque<f64>);

    impl RandomSource for Scripted {
        fn uniform(&mut self, _low: f64, _high: f64) -> f64 {
            self.0.pop_front().expect("script exhausted")
        }
    }

    fn request(enrolled: &[&str], attempts: Vec<QuizAttempt>) -> RecommendationRequest {
        RecommendationRequest {
            user_id: "user-1".to_string(),
            enrolled_courses: enrolled.iter().map(|s| s.to_string()).collect(),
            completed_modules: Vec::new(),
            quiz_attempts: attempts,
        }
    }

    fn quiz(course_id: &str, score: f64) -> QuizAttempt {
        QuizAttempt {
            course_id: course_id.to_string(),
            score,
            passed: true,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_score_formula_with_default_mastery() {
        let engine = RecommendationEngine::default();
        let score = engine.score_candidate(
            &MasteryMap::default(),
            "course_ml",
            Topic::AiMlBasics,
            &[],
            &mut Midpoint,
        );
        // 0.45*0.5 + 0.25*0.5 + 0.15*1.0 + 0.15*0.85
        assert_close(score, 0.6275);
    }

    #[test]
    fn test_high_mastery_lowers_weakness_term() {
        let engine = RecommendationEngine::default();
        let mastery = estimate_mastery(&[quiz("course_dbms_1", 90.0)]);
        let score =
            engine.score_candidate(&mastery, "course_dbms", Topic::Dbms, &[], &mut Midpoint);
        // weakness 0.1 contributes 0.045
        assert_close(score, 0.4475);
    }

    #[test]
    fn test_popularity_drawn_before_jitter() {
        let engine = RecommendationEngine::default();
        let mut rng = Scripted(VecDeque::from(vec![1.0, 0.1]));
        let score = engine.score_candidate(
            &MasteryMap::default(),
            "course_os",
            Topic::Os,
            &[],
            &mut rng,
        );
        // pop = 1.0, engagement = 0.6
        assert_close(score, 0.675);
        assert!(rng.0.is_empty());
    }

    #[test]
    fn test_enrolled_course_scores_zero_without_draws() {
        let engine = RecommendationEngine::default();
        let mut rng = Scripted(VecDeque::new());
        let score = engine.score_candidate(
            &MasteryMap::default(),
            "course_cn",
            Topic::Cn,
            &["course_cn".to_string()],
            &mut rng,
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_score_clamped_to_unit_interval() {
        let engine = RecommendationEngine::default();

        // 30 enrollments drive saturation to -2.0
        let enrolled: Vec<String> = (0..30).map(|i| format!("elective_{i}")).collect();
        let mastered = estimate_mastery(&[quiz("course_oop", 100.0)]);
        let low = engine.score_candidate(&mastered, "course_oop", Topic::Oop, &enrolled, &mut Midpoint);
        assert_eq!(low, 0.0);

        // Negative quiz scores push weakness above 1
        let struggling = estimate_mastery(&[quiz("course_oop", -100.0)]);
        let high = engine.score_candidate(&struggling, "course_oop", Topic::Oop, &[], &mut Midpoint);
        assert_eq!(high, 1.0);
    }

    #[test]
    fn test_fresh_learner_gets_full_catalog() {
        let engine = RecommendationEngine::default();
        let response = engine.recommend(&request(&[], Vec::new()), &mut rand::thread_rng());

        assert_eq!(response.recommended_courses.len(), 8);
        assert_eq!(response.recommended_topics.len(), 5);
        for pair in response.recommended_courses.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_all_enrolled_yields_empty_result() {
        let engine = RecommendationEngine::default();
        let enrolled = [
            "course_dbms",
            "course_dsa",
            "course_os",
            "course_cn",
            "course_oop",
            "course_system",
            "course_ml",
            "course_cyber",
        ];
        let (response, metrics) =
            engine.recommend_with_metrics(&request(&enrolled, Vec::new()), &mut Midpoint);

        assert!(response.recommended_courses.is_empty());
        assert!(response.recommended_topics.is_empty());
        assert_eq!(metrics.skipped_enrolled, 8);
        assert_eq!(metrics.avg_score, 0.0);
    }

    #[test]
    fn test_enrolled_courses_excluded() {
        let engine = RecommendationEngine::default();
        let response = engine.recommend(
            &request(&["course_dsa", "course_ml"], Vec::new()),
            &mut rand::thread_rng(),
        );

        assert_eq!(response.recommended_courses.len(), 6);
        assert!(response
            .recommended_courses
            .iter()
            .all(|c| c.course_id != "course_dsa" && c.course_id != "course_ml"));
    }

    #[test]
    fn test_threshold_filters_weak_candidates() {
        let engine = RecommendationEngine::default();
        // Ten unrelated enrollments zero the saturation term
        let enrolled: Vec<String> = (0..10).map(|i| format!("elective_{i}")).collect();
        let enrolled: Vec<&str> = enrolled.iter().map(String::as_str).collect();
        let attempts = vec![quiz("course_dbms", 100.0), quiz("course_dsa", 100.0)];

        let (response, metrics) =
            engine.recommend_with_metrics(&request(&enrolled, attempts), &mut Midpoint);

        // Mastered topics score 0.125 + 0.1275 = 0.2525 and are dropped
        assert_eq!(metrics.below_threshold, 2);
        assert_eq!(response.recommended_courses.len(), 6);
        assert!(!response.recommended_topics.contains(&Topic::Dbms));
        assert!(!response.recommended_topics.contains(&Topic::Dsa));
    }

    #[test]
    fn test_sorted_by_score_with_weakest_topic_first() {
        let engine = RecommendationEngine::default();
        let attempts = vec![quiz("course_cn", 20.0), quiz("course_os", 95.0)];
        let response = engine.recommend(&request(&[], attempts), &mut Midpoint);

        let first = &response.recommended_courses[0];
        assert_eq!(first.course_id, "course_cn");
        assert_eq!(first.reason, "Critical for networking and distributed systems.");
        assert_eq!(response.recommended_topics[0], Topic::Cn);

        let last = response.recommended_courses.last().unwrap();
        assert_eq!(last.course_id, "course_os");
    }

    #[test]
    fn test_topics_follow_score_order_and_ties_keep_catalog_order() {
        let engine = RecommendationEngine::default();
        let response = engine.recommend(&request(&[], Vec::new()), &mut Midpoint);

        // Every candidate ties, so catalog order survives
        let ids: Vec<&str> = response
            .recommended_courses
            .iter()
            .map(|c| c.course_id.as_str())
            .collect();
        assert_eq!(ids[0], "course_dbms");
        assert_eq!(ids[7], "course_cyber");
        assert_eq!(
            response.recommended_topics,
            vec![Topic::Dbms, Topic::Dsa, Topic::Os, Topic::Cn, Topic::Oop]
        );
    }

    #[test]
    fn test_limits_bound_results() {
        let limits = RankingLimits {
            min_score: 0.3,
            max_courses: 3,
            max_topics: 2,
        };
        let engine = RecommendationEngine::new(limits);
        let response = engine.recommend(&request(&[], Vec::new()), &mut rand::thread_rng());
        assert_eq!(response.recommended_courses.len(), 3);
        assert_eq!(response.recommended_topics.len(), 2);
    }

    #[test]
    fn test_topics_come_from_returned_courses() {
        let limits = RankingLimits {
            min_score: 0.3,
            max_courses: 3,
            max_topics: 5,
        };
        let engine = RecommendationEngine::new(limits);
        let response = engine.recommend(&request(&[], Vec::new()), &mut Midpoint);

        // Ties keep catalog order, so the cut leaves dbms, dsa and os
        assert_eq!(response.recommended_courses.len(), 3);
        assert_eq!(
            response.recommended_topics,
            vec![Topic::Dbms, Topic::Dsa, Topic::Os]
        );
    }

    #[test]
    fn test_custom_weights() {
        let weights = ScoringWeights {
            weakness: 1.0,
            engagement: 0.0,
            saturation: 0.0,
            popularity: 0.0,
        };
        let engine = RecommendationEngine::with_weights(RankingLimits::default(), weights);
        let mastery = estimate_mastery(&[quiz("course_dsa", 25.0)]);
        let score = engine.score_candidate(&mastery, "course_dsa", Topic::Dsa, &[], &mut Midpoint);
        assert_close(score, 0.75);
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let response = RecommendationResponse {
            recommended_courses: vec![RecommendedCourse {
                course_id: "course_system".to_string(),
                score: 0.5,
                reason: "Next step after mastering fundamentals.".to_string(),
            }],
            recommended_topics: vec![Topic::SystemDesign],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["recommendedCourses"][0]["courseId"], "course_system");
        assert_eq!(json["recommendedTopics"][0], "System Design");
    }
}
