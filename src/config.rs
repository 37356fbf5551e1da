//! Configuration management for the SkillForge ML engine
//!
//! Strongly-typed configuration read from environment variables, with
//! defaults that reproduce the stock ranking behaviour when nothing is set.
//!
//! # Example
//! ```no_run
//! use skillforge::Config;
//! let config = Config::from_env().expect("failed to load config");
//! println!("Listening on {}:{}", config.api.host, config.api.port);
//! ```

use crate::error::{Error, Result};
use std::time::Duration;
use tracing::{info, warn};

/// Main application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,
    /// Recommendation engine configuration
    pub recommendation: RecommendationConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Port to listen on
    pub port: u16,
    /// Host to bind to
    pub host: String,
    /// Request timeout
    pub request_timeout: Duration,
    /// Maximum request body size
    pub max_body_size: usize,
    /// Maximum requests processed at once
    pub max_concurrent_requests: usize,
    /// Enable CORS
    pub cors_enabled: bool,
    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            request_timeout: Duration::from_secs(30),
            max_body_size: 1024 * 1024,
            max_concurrent_requests: 1024,
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl ApiConfig {
    /// True when CORS should accept any origin
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Recommendation engine configuration
#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    /// Candidates must score strictly above this to be recommended
    pub min_score: f64,
    /// Maximum courses returned
    pub max_courses: usize,
    /// Maximum distinct topics returned
    pub max_topics: usize,
    /// Seed every request's random draws with this value
    pub random_seed: Option<u64>,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            min_score: 0.3,
            max_courses: 8,
            max_topics: 5,
            random_seed: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Platforms that mount secrets as files point FFOLDER at a directory where
        // each file name is the env var name and its contents the value.
        if let Ok(folder) = std::env::var("FFOLDER") {
            load_env_folder(&folder);
        } else {
            // Try to load .env file (ignore if not found)
            dotenvy::dotenv().ok();
        }

        let config = Self {
            api: ApiConfig::from_env()?,
            recommendation: RecommendationConfig::from_env()?,
        };

        config.validate()?;
        config.log_summary();

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.port == 0 {
            return Err(Error::InvalidConfig {
                key: "API_PORT",
                message: "port must be non-zero".into(),
            });
        }

        if self.api.request_timeout.is_zero() {
            return Err(Error::InvalidConfig {
                key: "API_REQUEST_TIMEOUT_SECS",
                message: "timeout must be non-zero".into(),
            });
        }

        if self.api.max_concurrent_requests == 0 {
            return Err(Error::InvalidConfig {
                key: "API_MAX_CONCURRENT_REQUESTS",
                message: "concurrency limit must be non-zero".into(),
            });
        }

        let min_score = self.recommendation.min_score;
        if !(0.0..=1.0).contains(&min_score) {
            return Err(Error::InvalidConfig {
                key: "REC_MIN_SCORE",
                message: format!("min score must be within [0, 1], got {}", min_score).into(),
            });
        }

        for (key, value) in [
            ("REC_MAX_COURSES", self.recommendation.max_courses),
            ("REC_MAX_TOPICS", self.recommendation.max_topics),
        ] {
            if value == 0 {
                return Err(Error::InvalidConfig {
                    key,
                    message: "limit must be at least 1".into(),
                });
            }
        }

        Ok(())
    }

    /// Log configuration summary
    fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  API:");
        info!("    Listening on: {}:{}", self.api.host, self.api.port);
        info!("    Request timeout: {:?}", self.api.request_timeout);
        info!(
            "    CORS: {} (origins: {})",
            self.api.cors_enabled,
            self.api.cors_origins.join(",")
        );
        info!("  Recommendation:");
        info!("    Min score: {}", self.recommendation.min_score);
        info!(
            "    Limits: {} courses, {} topics",
            self.recommendation.max_courses, self.recommendation.max_topics
        );
        if let Some(seed) = self.recommendation.random_seed {
            warn!("    Random seed pinned to {} (deterministic rankings)", seed);
        }
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            port: get_env_or("API_PORT", "8000").parse().unwrap_or(defaults.port),
            host: get_env_or("API_HOST", &defaults.host),
            request_timeout: Duration::from_secs(
                get_env_or("API_REQUEST_TIMEOUT_SECS", "30")
                    .parse()
                    .unwrap_or(30),
            ),
            max_body_size: get_env_or("API_MAX_BODY_SIZE", "1048576")
                .parse()
                .unwrap_or(defaults.max_body_size),
            max_concurrent_requests: get_env_or("API_MAX_CONCURRENT_REQUESTS", "1024")
                .parse()
                .unwrap_or(defaults.max_concurrent_requests),
            cors_enabled: get_env_or("API_CORS_ENABLED", "true")
                .parse()
                .unwrap_or(true),
            cors_origins: parse_list(&get_env_or("API_CORS_ORIGINS", "*")),
        })
    }
}

impl RecommendationConfig {
    fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let random_seed = match std::env::var("REC_RANDOM_SEED") {
            Ok(raw) if !raw.trim().is_empty() => Some(raw.trim().parse().map_err(
                |e: std::num::ParseIntError| Error::InvalidConfig {
                    key: "REC_RANDOM_SEED",
                    message: format!("Invalid value '{}': {}", raw, e).into(),
                },
            )?),
            _ => None,
        };

        Ok(Self {
            min_score: get_env_or("REC_MIN_SCORE", "0.3")
                .parse()
                .unwrap_or(defaults.min_score),
            max_courses: get_env_or("REC_MAX_COURSES", "8")
                .parse()
                .unwrap_or(defaults.max_courses),
            max_topics: get_env_or("REC_MAX_TOPICS", "5")
                .parse()
                .unwrap_or(defaults.max_topics),
            random_seed,
        })
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Export every file in `folder` as an env var unless already set
fn load_env_folder(folder: &str) {
    let path = std::path::Path::new(folder);
    if !path.is_dir() {
        warn!("FFOLDER {} is not a directory, ignoring", folder);
        return;
    }

    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Failed to read FFOLDER {}: {}", folder, err);
            return;
        }
    };

    for entry in entries.flatten() {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if let Ok(contents) = std::fs::read_to_string(&file_path) {
            if std::env::var(&name).is_err() {
                std::env::set_var(&name, contents.trim());
            }
        }
    }
    info!("Loaded configuration from FFOLDER={}", folder);
}

/// Get environment variable with default
fn get_env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split a comma-separated list, dropping blanks
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
