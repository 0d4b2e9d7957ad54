use chrono::Utc;
use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::UserRecord;
use super::tables::*;

impl Database {
    // ========================================================================
    // User operations
    // ========================================================================

    /// Create a user. Fails with [`DatabaseError::UsernameTaken`] when the
    /// username index already holds an entry; check and insert happen in
    /// one write transaction.
    pub fn create_user(
        &self,
        username: &str,
        password_hash: &[u8],
        password_salt: &[u8],
    ) -> Result<UserRecord, DatabaseError> {
        debug_assert!(!username.is_empty(), "username must not be empty");

        let write_txn = self.begin_write()?;
        let user = {
            {
                let index = write_txn.open_table(USERNAMES)?;
                if index.get(username)?.is_some() {
                    return Err(DatabaseError::UsernameTaken(username.to_string()));
                }
            }

            let id = Self::next_id(&write_txn, "users")?;
            let user = UserRecord {
                id,
                username: username.to_string(),
                password_hash: password_hash.to_vec(),
                password_salt: password_salt.to_vec(),
                created_at: Utc::now(),
            };

            let mut table = write_txn.open_table(USERS)?;
            let data = rmp_serde::to_vec_named(&user)?;
            table.insert(id, data.as_slice())?;

            let mut index = write_txn.open_table(USERNAMES)?;
            index.insert(username, id)?;

            user
        };
        write_txn.commit()?;
        Ok(user)
    }

    /// Get a user by id
    pub fn get_user(&self, id: u64) -> Result<Option<UserRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(USERS)?;

        match table.get(id)? {
            Some(data) => {
                let user: UserRecord = rmp_serde::from_slice(data.value())?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Get a user by username (resolves username -> id -> user)
    pub fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let index = read_txn.open_table(USERNAMES)?;

        let id = match index.get(username)? {
            Some(data) => data.value(),
            None => return Ok(None),
        };

        let users_table = read_txn.open_table(USERS)?;
        match users_table.get(id)? {
            Some(data) => {
                let user: UserRecord = rmp_serde::from_slice(data.value())?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Check if a username is already in use
    pub fn username_exists(&self, username: &str) -> Result<bool, DatabaseError> {
        let read_txn = self.begin_read()?;
        let index = read_txn.open_table(USERNAMES)?;
        Ok(index.get(username)?.is_some())
    }
}
