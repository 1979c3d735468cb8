pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::infra::http::middleware::{log_responses, set_request_context};

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/posts", get(handlers::list_posts))
        .route("/api/v1/posts/", get(handlers::list_posts))
        .route("/api/v1/posts/{slug}", get(handlers::get_post))
        .route("/api/v1/posts/{slug}/", get(handlers::get_post))
        .fallback(handlers::fallback)
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
