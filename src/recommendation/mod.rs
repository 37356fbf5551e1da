//! Recommendation Module
//!
//! Course recommendations and difficulty estimates for SkillForge learners.
//!
//! ## Architecture
//!
//! 1. **Mastery** - Average quiz scores into per-topic mastery (0-1)
//! 2. **Engine** - Score catalog courses, filter, sort and truncate
//! 3. **Difficulty** - Bucket aggregate stats into a difficulty label
//!
//! ## Algorithm Overview
//!
//! Each catalog course the learner is not enrolled in is scored as:
//! - Weakness (45%): one minus topic mastery, 0.5 mastery when unseen
//! - Engagement (25%): 0.5 baseline with ±0.1 jitter
//! - Saturation (15%): shrinks linearly with enrollment count
//! - Popularity (15%): uniform in [0.7, 1.0)
//!
//! Scores are clamped to [0, 1]; only courses above 0.3 are recommended.
//! The random terms make repeated requests vary on purpose.

pub mod difficulty;
pub mod engine;
pub mod mastery;
pub mod metrics;
pub mod random;
pub mod topics;

// Re-export the types that are actually used externally
pub use difficulty::{DifficultyEstimate, DifficultyLevel, DifficultyRequest};
pub use engine::{
    RankingLimits, RecommendationEngine, RecommendationRequest, RecommendationResponse,
    RecommendedCourse,
};
pub use mastery::{MasteryMap, QuizAttempt};
pub use random::RandomSource;
pub use topics::Topic;
