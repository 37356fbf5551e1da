//! HTTP API Server for Recommendations
//!
//! Thin transport around the scoring core: JSON in, JSON out. Request shape
//! validation happens in [`ValidatedJson`]; the handlers themselves cannot fail.

use axum::{
    async_trait,
    error_handling::HandleErrorLayer,
    extract::{DefaultBodyLimit, FromRequest, Request, State},
    http::HeaderValue,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower::timeout::{error::Elapsed, TimeoutLayer};
use tower::{BoxError, ServiceBuilder};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, warn};

use crate::config::{ApiConfig, Config};
use crate::error::{Error, Result};
use crate::recommendation::{
    difficulty::{self, DifficultyEstimate, DifficultyRequest},
    engine::{RankingLimits, RecommendationEngine, RecommendationRequest, RecommendationResponse},
    metrics::RecommendationMetrics,
    random::request_rng,
};

pub const HEALTH_STATUS: &str = "SkillForge ML Service is running!";

/// Shared application state
pub struct AppState {
    pub engine: RecommendationEngine,
    /// Pins every request's random draws when set
    pub random_seed: Option<u64>,
    #[cfg(feature = "prometheus")]
    pub prometheus: Option<metrics_exporter_prometheus::PrometheusHandle>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            engine: RecommendationEngine::new(RankingLimits::from(&config.recommendation)),
            random_seed: config.recommendation.random_seed,
            #[cfg(feature = "prometheus")]
            prometheus: None,
        }
    }

    fn rank(
        &self,
        request: &RecommendationRequest,
    ) -> (RecommendationResponse, RecommendationMetrics) {
        let mut rng = request_rng(self.random_seed);
        self.engine.recommend_with_metrics(request, &mut rng)
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// JSON body extractor whose rejections use the service error format
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Build the router with all middleware applied
pub fn router(config: &Config, state: AppState) -> Router {
    let state = Arc::new(state);

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/recommend", post(recommend))
        .route("/difficulty", post(estimate_difficulty));

    #[cfg(feature = "prometheus")]
    let app = app.route("/metrics", get(render_metrics));

    let mut app = app
        .layer(DefaultBodyLimit::max(config.api.max_body_size))
        .with_state(state);

    if config.api.cors_enabled {
        app = app.layer(cors_layer(&config.api));
    }

    let app = app.layer(ConcurrencyLimitLayer::new(config.api.max_concurrent_requests));

    with_request_timeout(app, config.api.request_timeout).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(CompressionLayer::new()),
    )
}

/// Bound every request by `timeout`, answering expiries in the error body format
pub fn with_request_timeout(app: Router, timeout: Duration) -> Router {
    app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                middleware_error(err, timeout)
            }))
            .layer(TimeoutLayer::new(timeout)),
    )
}

fn middleware_error(err: BoxError, timeout: Duration) -> Error {
    if err.is::<Elapsed>() {
        warn!("⏱️ Request exceeded {:?}", timeout);
        Error::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    } else {
        Error::Internal { source: Some(err) }
    }
}

fn cors_layer(api: &ApiConfig) -> CorsLayer {
    let origin = if api.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = api
            .cors_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server and run until `shutdown` resolves
pub async fn start_server(
    config: &Config,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = router(config, state);

    let addr = format!("{}:{}", config.api.host, config.api.port);
    info!("🚀 Starting recommendation API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HEALTH_STATUS.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Rank catalog courses for a learner
async fn recommend(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RecommendationRequest>,
) -> Json<RecommendationResponse> {
    debug!(
        user_id = %request.user_id,
        enrolled = request.enrolled_courses.len(),
        completed_modules = request.completed_modules.len(),
        quiz_attempts = request.quiz_attempts.len(),
        "📥 Recommendation request"
    );

    let (response, metrics) = state.rank(&request);
    metrics.publish();

    debug!(
        request_id = %metrics.request_id,
        returned = metrics.recommendations_returned,
        avg_score = metrics.avg_score,
        duration_us = metrics.scoring_duration_us,
        "📊 Recommendations computed"
    );

    Json(response)
}

/// Estimate difficulty from learner statistics
async fn estimate_difficulty(
    ValidatedJson(request): ValidatedJson<DifficultyRequest>,
) -> Json<DifficultyEstimate> {
    let estimate = difficulty::estimate_from_stats(&request.user_stats);

    metrics::counter!(
        "difficulty_estimates_total",
        "level" => estimate.estimated_difficulty.as_str()
    )
    .increment(1);

    debug!(
        course_id = %request.course_id,
        level = %estimate.estimated_difficulty,
        "🎚️ Difficulty estimated"
    );

    Json(estimate)
}

/// Prometheus scrape endpoint
#[cfg(feature = "prometheus")]
async fn render_metrics(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<String, axum::http::StatusCode> {
    state
        .prometheus
        .as_ref()
        .map(|handle| handle.render())
        .ok_or(axum::http::StatusCode::NOT_FOUND)
}
