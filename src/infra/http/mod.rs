pub mod error;
pub mod handlers;
mod middleware;

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::application::jobs::RenderJobService;
use crate::config::CorsSettings;
use crate::infra::assets::PublicAssets;

use middleware::{apply_cors, log_responses, set_request_context};

#[derive(Clone)]
pub struct HttpState {
    pub jobs: Arc<RenderJobService>,
    pub assets: Option<PublicAssets>,
}

pub fn build_router(state: HttpState, cors: &CorsSettings) -> Router {
    Router::new()
        .route("/submit-job", post(handlers::submit_job))
        .route("/process-job/{job_id}", post(handlers::process_job))
        .route("/download/{render_id}", get(handlers::download_render))
        .route("/_health", get(handlers::health))
        .fallback(handlers::serve_asset)
        .with_state(state)
        .layer(axum_middleware::from_fn_with_state(
            cors.allow_origin.clone(),
            apply_cors,
        ))
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
