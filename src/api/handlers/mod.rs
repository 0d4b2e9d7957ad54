mod accounts;
mod admin;
mod books;
mod reviews;

pub use accounts::{login, login_page, logout, signup, signup_page};
pub use admin::{admin_purge, health};
pub use books::{
    create_book, create_book_page, delete_book, delete_book_page, detail_book, list_books,
    update_book, update_book_page,
};
pub use reviews::{create_review, create_review_page};
