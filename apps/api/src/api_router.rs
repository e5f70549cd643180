use axum::Router;
use axum::routing::{get, post};
use blend_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

mod cors;

pub fn build_router(
    app_state: AppState,
    cors_allowed_origin: Option<&str>,
) -> Result<Router, AppError> {
    Ok(Router::new()
        .route("/", post(handlers::blend::publish_blend_handler))
        .route("/blend", post(handlers::blend::publish_blend_handler))
        .route(
            "/update_user_attributes",
            post(handlers::user_attributes::update_user_attributes_handler),
        )
        .route("/health", get(handlers::health::health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(cors_allowed_origin)?)
        .with_state(app_state))
}
