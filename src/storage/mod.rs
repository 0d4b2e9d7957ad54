pub mod db;
pub mod models;
mod reviews;
mod sessions;
mod shelves;
mod tables;
mod users;

pub use db::{Database, DatabaseError};
pub use shelves::RankedShelf;
pub use tables::*;
