use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        // Books
        .route("/", get(handlers::list_books))
        .route("/book/:id", get(handlers::detail_book))
        .route(
            "/book/create",
            get(handlers::create_book_page).post(handlers::create_book),
        )
        .route(
            "/book/:id/update",
            get(handlers::update_book_page).post(handlers::update_book),
        )
        .route(
            "/book/:id/delete",
            get(handlers::delete_book_page).post(handlers::delete_book),
        )
        // Reviews
        .route(
            "/book/:id/review",
            get(handlers::create_review_page).post(handlers::create_review),
        )
        // Accounts
        .route(
            "/signup",
            get(handlers::signup_page).post(handlers::signup),
        )
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/logout", post(handlers::logout))
        // Internal
        .route("/_internal/health", get(handlers::health));

    // Test-only routes
    if state.config.test_mode {
        tracing::warn!("Test mode enabled — purge route is available.");
        router = router.route("/admin/purge", delete(handlers::admin_purge));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
