//! HTTP handlers module
//!
//! Exposes the consultation pipeline over HTTP

pub mod consulta;
pub mod health;

use crate::config::Settings;
use crate::middleware::logging::request_logging_middleware;
use crate::services::ConsultaPipeline;
use crate::utils::error::AppResult;
use axum::{middleware, routing::get, routing::post, Router};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub pipeline: Arc<ConsultaPipeline>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(settings: Settings, pipeline: Arc<ConsultaPipeline>) -> Self {
        Self {
            settings,
            pipeline,
            started_at: Instant::now(),
        }
    }
}

/// Create application router backed by the OpenAI provider and configured sink
pub fn create_router(settings: Settings) -> AppResult<Router> {
    let pipeline = Arc::new(ConsultaPipeline::from_settings(&settings)?);
    Ok(router_with_state(AppState::new(settings, pipeline)))
}

/// Create application router around an existing state
pub fn router_with_state(state: AppState) -> Router {
    let body_limit = state.settings.server.max_request_size;
    let app_state = Arc::new(state);

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(body_limit));

    Router::new()
        .route("/v1/consultas", post(consulta::handle_consulta))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .layer(middleware::from_fn(request_logging_middleware))
        .with_state(app_state)
        .layer(middleware_stack)
}
