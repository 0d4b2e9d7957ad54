use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::api::pagination::Paginator;
use crate::api::response::{render, AppQuery, PageError};
use crate::api::templates::{
    BookCreatePage, BookDeletePage, BookDetailPage, BookFormView, BookListPage, BookUpdatePage,
    BookView, RankedView, ReviewView, Viewer,
};
use crate::auth::{CurrentUser, OptionalUser};
use crate::storage::models::{ShelfChanges, ShelfRecord, UserRecord};
use crate::AppState;

/// Reviews shown per detail page.
const REVIEWS_PER_PAGE: usize = 3;
/// Entries in the list page's top-rated ranking.
const RANKING_SIZE: usize = 3;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub thumbnail: String,
}

impl BookForm {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push("Title is required.".to_string());
        }
        if self.text.trim().is_empty() {
            errors.push("Text is required.".to_string());
        }
        if self.category.trim().is_empty() {
            errors.push("Category is required.".to_string());
        }
        errors
    }

    fn changes(&self) -> ShelfChanges {
        let thumbnail = self.thumbnail.trim();
        ShelfChanges {
            title: self.title.trim().to_string(),
            text: self.text.trim().to_string(),
            category: self.category.trim().to_string(),
            thumbnail: if thumbnail.is_empty() {
                None
            } else {
                Some(thumbnail.to_string())
            },
        }
    }

    fn view(&self) -> BookFormView {
        BookFormView {
            title: self.title.clone(),
            text: self.text.clone(),
            category: self.category.clone(),
            thumbnail: self.thumbnail.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DetailParams {
    #[serde(default)]
    pub page: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_books(
    State(state): State<Arc<AppState>>,
    OptionalUser(user): OptionalUser,
) -> Result<Response, PageError> {
    let shelves = state.db.list_shelves()?;
    let ranking = state.db.ranking(RANKING_SIZE)?;

    let page = BookListPage {
        viewer: Viewer::for_user(user.as_ref()),
        ranking: ranking.iter().map(RankedView::from_entry).collect(),
        books: shelves.iter().map(BookView::from_record).collect(),
    };
    render(&page)
}

pub async fn detail_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    AppQuery(params): AppQuery<DetailParams>,
    OptionalUser(user): OptionalUser,
) -> Result<Response, PageError> {
    let shelf = state.db.get_shelf(id)?.ok_or_else(PageError::not_found)?;

    let reviews: Vec<ReviewView> = state
        .db
        .reviews_for_book(id)?
        .iter()
        .map(ReviewView::from_record)
        .collect();
    let review_page = Paginator::new(REVIEWS_PER_PAGE).get_page(reviews, params.page.as_deref());

    let can_edit = user.as_ref().map(|u| u.id == shelf.user_id).unwrap_or(false);
    let page = BookDetailPage::paginate(
        Viewer::for_user(user.as_ref()),
        BookView::from_record(&shelf),
        can_edit,
        review_page,
    );
    render(&page)
}

pub async fn create_book_page(CurrentUser(user): CurrentUser) -> Result<Response, PageError> {
    let page = BookCreatePage {
        viewer: Viewer::for_user(Some(&user)),
        form: BookFormView::default(),
        errors: Vec::new(),
    };
    render(&page)
}

pub async fn create_book(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<BookForm>,
) -> Result<Response, PageError> {
    let errors = form.validate();
    if !errors.is_empty() {
        let page = BookCreatePage {
            viewer: Viewer::for_user(Some(&user)),
            form: form.view(),
            errors,
        };
        return render(&page);
    }

    let shelf = state.db.create_shelf(user.id, &form.changes())?;
    tracing::debug!(shelf_id = shelf.id, user_id = user.id, "Created book");

    Ok(Redirect::to("/").into_response())
}

pub async fn update_book_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Response, PageError> {
    let shelf = owned_shelf(&state, &user, id, EDIT_DENIED)?;

    let page = BookUpdatePage {
        viewer: Viewer::for_user(Some(&user)),
        book_id: shelf.id,
        form: BookFormView::from_record(&shelf),
        errors: Vec::new(),
    };
    render(&page)
}

pub async fn update_book(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
    Form(form): Form<BookForm>,
) -> Result<Response, PageError> {
    let shelf = owned_shelf(&state, &user, id, EDIT_DENIED)?;

    let errors = form.validate();
    if !errors.is_empty() {
        let page = BookUpdatePage {
            viewer: Viewer::for_user(Some(&user)),
            book_id: shelf.id,
            form: form.view(),
            errors,
        };
        return render(&page);
    }

    state.db.update_shelf(id, &form.changes())?;
    tracing::debug!(shelf_id = id, user_id = user.id, "Updated book");

    Ok(Redirect::to("/").into_response())
}

pub async fn delete_book_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Response, PageError> {
    let shelf = owned_shelf(&state, &user, id, DELETE_DENIED)?;

    let page = BookDeletePage {
        viewer: Viewer::for_user(Some(&user)),
        book: BookView::from_record(&shelf),
    };
    render(&page)
}

pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Response, PageError> {
    owned_shelf(&state, &user, id, DELETE_DENIED)?;

    state.db.delete_shelf(id)?;
    tracing::debug!(shelf_id = id, user_id = user.id, "Deleted book");

    Ok(Redirect::to("/").into_response())
}

// ============================================================================
// Helpers
// ============================================================================

const EDIT_DENIED: &str = "You do not have permission to edit this book.";
const DELETE_DENIED: &str = "You do not have permission to delete this book.";

/// Load a shelf and enforce the ownership check before any mutation:
/// a requester that is not the owner gets the permission-denied page.
fn owned_shelf(
    state: &AppState,
    user: &UserRecord,
    id: u64,
    denied_message: &str,
) -> Result<ShelfRecord, PageError> {
    let shelf = state.db.get_shelf(id)?.ok_or_else(PageError::not_found)?;
    if shelf.user_id != user.id {
        return Err(PageError::forbidden(denied_message));
    }
    Ok(shelf)
}
