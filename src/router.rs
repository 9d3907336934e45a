use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Form posts are small; 1MB is plenty
const BODY_LIMIT: usize = 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .route("/", get(handlers::handle_index))
        .route("/health", get(handlers::handle_health))
        .route(
            "/login",
            get(handlers::handle_login_form).post(handlers::handle_login),
        )
        .route(
            "/register",
            get(handlers::handle_register_form).post(handlers::handle_register),
        )
        .route("/logout", get(handlers::handle_logout))
        .route(
            "/add_listing",
            get(handlers::handle_add_listing_form).post(handlers::handle_add_listing),
        )
        .route("/categories", get(handlers::handle_categories))
        .route("/categories/:category_id", get(handlers::handle_category))
        .route("/my_listings", get(handlers::handle_my_listings))
        .route(
            "/wishlist",
            get(handlers::handle_wishlist).post(handlers::handle_toggle_wishlist),
        )
        .route("/comment", post(handlers::handle_comment))
        .route("/close/:listing_id", post(handlers::handle_close_listing))
        .route(
            "/:listing_id",
            get(handlers::handle_view_listing).post(handlers::handle_bid),
        )
        .layer(cors)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
