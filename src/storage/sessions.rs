use chrono::{DateTime, Utc};
use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::SessionRecord;
use super::tables::*;

impl Database {
    // ========================================================================
    // Session operations
    // ========================================================================

    /// Store a login session under its token
    pub fn put_session(
        &self,
        token: &str,
        user_id: u64,
        expires_at: DateTime<Utc>,
    ) -> Result<SessionRecord, DatabaseError> {
        debug_assert!(!token.is_empty(), "session token must not be empty");

        let session = SessionRecord {
            token: token.to_string(),
            user_id,
            expires_at,
        };

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSIONS)?;
            let data = rmp_serde::to_vec_named(&session)?;
            table.insert(token, data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(session)
    }

    /// Look up a live session by token. An expired session is removed on
    /// the way out and reported as absent.
    pub fn get_session(&self, token: &str) -> Result<Option<SessionRecord>, DatabaseError> {
        let session = {
            let read_txn = self.begin_read()?;
            let table = read_txn.open_table(SESSIONS)?;
            match table.get(token)? {
                Some(data) => {
                    let session: SessionRecord = rmp_serde::from_slice(data.value())?;
                    Some(session)
                }
                None => None,
            }
        };

        match session {
            Some(session) if session.expires_at > Utc::now() => Ok(Some(session)),
            Some(_) => {
                self.delete_session(token)?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Delete a session (logout). Returns false when no such token exists.
    pub fn delete_session(&self, token: &str) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;
        let deleted = {
            let mut table = write_txn.open_table(SESSIONS)?;
            let out = table.remove(token)?.is_some();
            out
        };
        write_txn.commit()?;
        Ok(deleted)
    }
}
