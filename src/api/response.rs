use askama::Template;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::de::DeserializeOwned;

use super::templates::ErrorPage;
use crate::storage::DatabaseError;

// ============================================================================
// Page error type for handlers
// ============================================================================

/// A handler-level failure, rendered as an HTML error page. The exception
/// is `LoginRequired`, which redirects the requester to the login form with
/// a `next` parameter pointing back at the page they asked for.
#[derive(Debug)]
pub enum PageError {
    BadRequest(String),
    Forbidden(String),
    LoginRequired { next: String },
    NotFound,
    Internal(String),
}

impl PageError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        PageError::BadRequest(message.into())
    }

    /// The permission-denied signal: a 403 page carrying a user-facing message.
    pub fn forbidden(message: impl Into<String>) -> Self {
        PageError::Forbidden(message.into())
    }

    pub fn login_required(next: impl Into<String>) -> Self {
        PageError::LoginRequired { next: next.into() }
    }

    pub fn not_found() -> Self {
        PageError::NotFound
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PageError::Internal(message.into())
    }
}

impl From<DatabaseError> for PageError {
    fn from(e: DatabaseError) -> Self {
        PageError::Internal(e.to_string())
    }
}

impl From<askama::Error> for PageError {
    fn from(e: askama::Error) -> Self {
        PageError::Internal(format!("Template error: {e}"))
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::BadRequest(message) => error_page(StatusCode::BAD_REQUEST, &message),
            PageError::Forbidden(message) => error_page(StatusCode::FORBIDDEN, &message),
            PageError::LoginRequired { next } => {
                Redirect::to(&format!("/login?next={next}")).into_response()
            }
            PageError::NotFound => error_page(StatusCode::NOT_FOUND, "Page not found."),
            PageError::Internal(message) => {
                tracing::error!(error = %message, "Request failed");
                error_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Please try again later.",
                )
            }
        }
    }
}

fn error_page(status: StatusCode, message: &str) -> Response {
    let page = ErrorPage {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Error").to_string(),
        message: message.to_string(),
    };
    match page.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render error page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

/// Render a template into an HTML response.
pub fn render<T: Template>(template: &T) -> Result<Response, PageError> {
    Ok(Html(template.render()?).into_response())
}

// ============================================================================
// Custom extractors (reject with a rendered error page)
// ============================================================================

/// Drop-in replacement for `axum::extract::Query` that rejects with a
/// rendered error page.
pub struct AppQuery<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, PageError> {
        let query = parts.uri.query().unwrap_or_default();
        serde_qs::from_str(query)
            .map(AppQuery)
            .map_err(|e| PageError::bad_request(friendly_query_error(&e.to_string())))
    }
}

/// Translate serde/serde_qs error messages into human-friendly descriptions.
fn friendly_query_error(raw: &str) -> String {
    let cleaned = raw
        .replace("u32", "non-negative integer")
        .replace("u64", "non-negative integer")
        .replace("i32", "integer")
        .replace("i64", "integer");

    format!("Invalid query parameter: {cleaned}")
}
