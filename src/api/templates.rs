//! Askama page templates and the flattened view structs they render.
//! Handlers map storage records into these views; templates stay free of
//! `Option` plumbing.

use askama::Template;

use crate::api::pagination::Page;
use crate::storage::models::{ReviewRecord, ShelfRecord, UserRecord};
use crate::storage::RankedShelf;

// ============================================================================
// View structs
// ============================================================================

/// Login state of the requester, shown in the navigation bar.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub logged_in: bool,
    pub username: String,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self {
            logged_in: false,
            username: String::new(),
        }
    }

    pub fn for_user(user: Option<&UserRecord>) -> Self {
        match user {
            Some(user) => Self {
                logged_in: true,
                username: user.username.clone(),
            },
            None => Self::anonymous(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookView {
    pub id: u64,
    pub title: String,
    pub text: String,
    pub category: String,
    pub thumbnail: String,
}

impl BookView {
    pub fn from_record(shelf: &ShelfRecord) -> Self {
        Self {
            id: shelf.id,
            title: shelf.title.clone(),
            text: shelf.text.clone(),
            category: shelf.category.clone(),
            thumbnail: shelf.thumbnail.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankedView {
    pub id: u64,
    pub title: String,
    /// Mean rate formatted to one decimal, or a dash for unrated books.
    pub avg_display: String,
}

impl RankedView {
    pub fn from_entry(entry: &RankedShelf) -> Self {
        Self {
            id: entry.shelf.id,
            title: entry.shelf.title.clone(),
            avg_display: match entry.avg_rating {
                Some(avg) => format!("{avg:.1}"),
                None => "–".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReviewView {
    pub title: String,
    pub text: String,
    pub rate: u8,
}

impl ReviewView {
    pub fn from_record(review: &ReviewRecord) -> Self {
        Self {
            title: review.title.clone(),
            text: review.text.clone(),
            rate: review.rate,
        }
    }
}

/// Redisplay values for the book create/update form.
#[derive(Debug, Clone, Default)]
pub struct BookFormView {
    pub title: String,
    pub text: String,
    pub category: String,
    pub thumbnail: String,
}

impl BookFormView {
    pub fn from_record(shelf: &ShelfRecord) -> Self {
        Self {
            title: shelf.title.clone(),
            text: shelf.text.clone(),
            category: shelf.category.clone(),
            thumbnail: shelf.thumbnail.clone().unwrap_or_default(),
        }
    }
}

/// Redisplay values for the review form. `rate` stays a raw string so an
/// invalid submission comes back as typed.
#[derive(Debug, Clone, Default)]
pub struct ReviewFormView {
    pub title: String,
    pub text: String,
    pub rate: String,
}

// ============================================================================
// Pages
// ============================================================================

#[derive(Template)]
#[template(path = "book_list.html")]
pub struct BookListPage {
    pub viewer: Viewer,
    pub ranking: Vec<RankedView>,
    pub books: Vec<BookView>,
}

#[derive(Template)]
#[template(path = "book_detail.html")]
pub struct BookDetailPage {
    pub viewer: Viewer,
    pub book: BookView,
    pub can_edit: bool,
    pub reviews: Vec<ReviewView>,
    pub page_number: usize,
    pub num_pages: usize,
    pub has_prev: bool,
    pub prev_page: usize,
    pub has_next: bool,
    pub next_page: usize,
}

impl BookDetailPage {
    /// Fold a review page into the flattened pagination fields.
    pub fn paginate(
        viewer: Viewer,
        book: BookView,
        can_edit: bool,
        page: Page<ReviewView>,
    ) -> Self {
        Self {
            viewer,
            book,
            can_edit,
            page_number: page.number,
            num_pages: page.num_pages,
            has_prev: page.has_previous(),
            prev_page: page.previous_page_number(),
            has_next: page.has_next(),
            next_page: page.next_page_number(),
            reviews: page.items,
        }
    }
}

#[derive(Template)]
#[template(path = "book_create.html")]
pub struct BookCreatePage {
    pub viewer: Viewer,
    pub form: BookFormView,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "book_update.html")]
pub struct BookUpdatePage {
    pub viewer: Viewer,
    pub book_id: u64,
    pub form: BookFormView,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "book_confirm_delete.html")]
pub struct BookDeletePage {
    pub viewer: Viewer,
    pub book: BookView,
}

#[derive(Template)]
#[template(path = "review_form.html")]
pub struct ReviewFormPage {
    pub viewer: Viewer,
    pub book: BookView,
    pub form: ReviewFormView,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub viewer: Viewer,
    pub next: String,
    pub username: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupPage {
    pub viewer: Viewer,
    pub username: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub status: u16,
    pub reason: String,
    pub message: String,
}
