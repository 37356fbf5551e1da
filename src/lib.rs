//! SkillForge ML engine library crate
//!
//! Re-exports core modules for the binary, integration tests and external use.

pub mod api;
pub mod config;
pub mod error;
pub mod recommendation;

// Re-export commonly used types
pub use recommendation::{
    DifficultyEstimate, DifficultyLevel, QuizAttempt, RecommendationEngine, RecommendationRequest,
    RecommendationResponse, RecommendedCourse, Topic,
};
pub use config::Config;
pub use error::{Error, Result};
