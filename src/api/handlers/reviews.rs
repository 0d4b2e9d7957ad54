use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::api::response::{render, PageError};
use crate::api::templates::{BookView, ReviewFormPage, ReviewFormView, Viewer};
use crate::auth::CurrentUser;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub rate: String,
}

impl ReviewForm {
    /// Returns the parsed rate on success, the error list otherwise.
    fn validate(&self) -> Result<u8, Vec<String>> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push("Title is required.".to_string());
        }
        if self.text.trim().is_empty() {
            errors.push("Text is required.".to_string());
        }

        let rate = match self.rate.trim().parse::<u8>() {
            Ok(rate) if (1..=5).contains(&rate) => Some(rate),
            _ => {
                errors.push("Rate must be a number between 1 and 5.".to_string());
                None
            }
        };

        match (rate, errors.is_empty()) {
            (Some(rate), true) => Ok(rate),
            _ => Err(errors),
        }
    }

    fn view(&self) -> ReviewFormView {
        ReviewFormView {
            title: self.title.clone(),
            text: self.text.clone(),
            rate: self.rate.clone(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn create_review_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(book_id): Path<u64>,
) -> Result<Response, PageError> {
    let shelf = state
        .db
        .get_shelf(book_id)?
        .ok_or_else(PageError::not_found)?;

    let page = ReviewFormPage {
        viewer: Viewer::for_user(Some(&user)),
        book: BookView::from_record(&shelf),
        form: ReviewFormView::default(),
        errors: Vec::new(),
    };
    render(&page)
}

pub async fn create_review(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(book_id): Path<u64>,
    Form(form): Form<ReviewForm>,
) -> Result<Response, PageError> {
    // A review only ever attaches to an existing book
    let shelf = state
        .db
        .get_shelf(book_id)?
        .ok_or_else(PageError::not_found)?;

    let rate = match form.validate() {
        Ok(rate) => rate,
        Err(errors) => {
            let page = ReviewFormPage {
                viewer: Viewer::for_user(Some(&user)),
                book: BookView::from_record(&shelf),
                form: form.view(),
                errors,
            };
            return render(&page);
        }
    };

    let review = state
        .db
        .create_review(book_id, user.id, form.title.trim(), form.text.trim(), rate)?;
    tracing::debug!(
        review_id = review.id,
        shelf_id = book_id,
        user_id = user.id,
        "Created review"
    );

    Ok(Redirect::to(&format!("/book/{book_id}")).into_response())
}
