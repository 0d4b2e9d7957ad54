use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book entry stored in redb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelfRecord {
    pub id: u64,
    pub title: String,
    pub text: String,
    pub category: String,
    /// Cover image URL, if any.
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Owning user. Mutations are rejected for anyone else.
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A reader review attached to a shelf entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: u64,
    pub book_id: u64,
    pub title: String,
    pub text: String,
    /// Numeric score, 1..=5.
    pub rate: u8,
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
}

/// A registered user. The password is stored as a PBKDF2-HMAC-SHA256
/// hash alongside its per-user salt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

/// A browser login session (auth cookie).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token: String,
    pub user_id: u64,
    pub expires_at: DateTime<Utc>,
}

/// The mutable fields of a shelf entry, as submitted by its edit form.
#[derive(Debug, Clone)]
pub struct ShelfChanges {
    pub title: String,
    pub text: String,
    pub category: String,
    pub thumbnail: Option<String>,
}
