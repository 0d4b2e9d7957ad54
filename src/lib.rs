//! bookshelf - A server-rendered web application for cataloging books and reader reviews
//!
//! This crate provides book listing, detail pages with paginated reviews, and
//! owner-gated editing with:
//! - Session-cookie authentication (PBKDF2 password hashing via ring)
//! - redb embedded database for all records (ACID, MVCC, crash-safe)
//! - Askama compile-time HTML templates

pub mod api;
pub mod auth;
pub mod config;
pub mod storage;

use config::Config;
use storage::Database;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub db: Database,
}
