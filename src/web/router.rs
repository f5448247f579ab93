//! Axum router construction.

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::web::handlers;
use crate::web::schema::ensure_schema_middleware;
use crate::web::state::SharedState;
use crate::web::static_files::static_handler;

/// Build the complete router: static pages, the feedback form, health, and
/// embedded assets. Every request passes the schema guard first.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        // Static pages
        .route("/", get(handlers::pages::home_handler))
        .route("/about", get(handlers::pages::about_handler))
        .route("/services", get(handlers::pages::services_handler))
        .route("/members", get(handlers::pages::members_handler))
        .route("/contactus", get(handlers::pages::contactus_handler))
        .route("/education", get(handlers::pages::education_handler))
        // Feedback
        .route(
            "/feedback",
            get(handlers::feedback::feedback_form_handler)
                .post(handlers::feedback::submit_feedback_handler),
        )
        // Health
        .route("/health", get(handlers::health::health_handler))
        // Assets
        .route("/static/*path", get(static_handler))
        .fallback(handlers::pages::not_found_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            ensure_schema_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
