use redb::{Database as RedbDatabase, ReadTransaction, ReadableTable, WriteTransaction};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::tables::*;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Commit error: {0}")]
    Commit(Box<redb::CommitError>),
    #[error("Database error: {0}")]
    Redb(Box<redb::Error>),
    #[error("Database error: {0}")]
    RedbDatabase(Box<redb::DatabaseError>),
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),
    #[error("Storage error: {0}")]
    Storage(Box<redb::StorageError>),
    #[error("Table error: {0}")]
    Table(Box<redb::TableError>),
    #[error("Transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),
}

impl From<redb::CommitError> for DatabaseError {
    fn from(e: redb::CommitError) -> Self {
        DatabaseError::Commit(Box::new(e))
    }
}

impl From<redb::DatabaseError> for DatabaseError {
    fn from(e: redb::DatabaseError) -> Self {
        DatabaseError::RedbDatabase(Box::new(e))
    }
}

impl From<redb::Error> for DatabaseError {
    fn from(e: redb::Error) -> Self {
        DatabaseError::Redb(Box::new(e))
    }
}

impl From<redb::StorageError> for DatabaseError {
    fn from(e: redb::StorageError) -> Self {
        DatabaseError::Storage(Box::new(e))
    }
}

impl From<redb::TableError> for DatabaseError {
    fn from(e: redb::TableError) -> Self {
        DatabaseError::Table(Box::new(e))
    }
}

impl From<redb::TransactionError> for DatabaseError {
    fn from(e: redb::TransactionError) -> Self {
        DatabaseError::Transaction(Box::new(e))
    }
}

pub struct Database {
    db: Arc<RedbDatabase>,
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}

/// Statistics from a purge operation
#[derive(Debug, Default)]
pub struct PurgeStats {
    pub shelves: u64,
    pub reviews: u64,
    pub users: u64,
    pub sessions: u64,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(data_dir.as_ref())?;
        let db_path = data_dir.as_ref().join("bookshelf.redb");
        let db = Arc::new(RedbDatabase::create(db_path)?);

        // Initialize application tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SHELVES)?;
            let _ = write_txn.open_table(REVIEWS)?;
            let _ = write_txn.open_table(BOOK_REVIEWS)?;
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERNAMES)?;
            let _ = write_txn.open_table(SESSIONS)?;
            let _ = write_txn.open_table(COUNTERS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Begin a read transaction
    pub fn begin_read(&self) -> Result<ReadTransaction, DatabaseError> {
        Ok(self.db.begin_read()?)
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> Result<WriteTransaction, DatabaseError> {
        Ok(self.db.begin_write()?)
    }

    /// Issue the next id in a named sequence. Must be called inside the
    /// write transaction that inserts the record.
    pub(crate) fn next_id(
        txn: &WriteTransaction,
        sequence: &str,
    ) -> Result<u64, DatabaseError> {
        let mut counters = txn.open_table(COUNTERS)?;
        let next = counters.get(sequence)?.map(|v| v.value()).unwrap_or(0) + 1;
        counters.insert(sequence, next)?;
        Ok(next)
    }

    // ========================================================================
    // Admin operations
    // ========================================================================

    /// Purge all data - for testing only
    pub fn purge_all(&self) -> Result<PurgeStats, DatabaseError> {
        let write_txn = self.begin_write()?;
        let mut stats = PurgeStats::default();

        stats.shelves = clear_u64_table(&write_txn, SHELVES)?;
        stats.reviews = clear_u64_table(&write_txn, REVIEWS)?;
        clear_u64_table(&write_txn, BOOK_REVIEWS)?;
        stats.users = clear_u64_table(&write_txn, USERS)?;
        stats.sessions = clear_str_table(&write_txn, SESSIONS)?;
        clear_str_index(&write_txn, USERNAMES)?;
        clear_str_index(&write_txn, COUNTERS)?;

        write_txn.commit()?;
        Ok(stats)
    }
}

fn clear_u64_table(
    txn: &WriteTransaction,
    def: redb::TableDefinition<u64, &[u8]>,
) -> Result<u64, DatabaseError> {
    let table = txn.open_table(def)?;
    let keys: Vec<u64> = table
        .iter()?
        .map(|r| r.map(|(k, _)| k.value()))
        .collect::<Result<Vec<_>, _>>()?;
    drop(table);

    let mut table = txn.open_table(def)?;
    let mut removed = 0;
    for key in keys {
        table.remove(key)?;
        removed += 1;
    }
    Ok(removed)
}

fn clear_str_table(
    txn: &WriteTransaction,
    def: redb::TableDefinition<&str, &[u8]>,
) -> Result<u64, DatabaseError> {
    let table = txn.open_table(def)?;
    let keys: Vec<String> = table
        .iter()?
        .map(|r| r.map(|(k, _)| k.value().to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    drop(table);

    let mut table = txn.open_table(def)?;
    let mut removed = 0;
    for key in keys {
        table.remove(key.as_str())?;
        removed += 1;
    }
    Ok(removed)
}

fn clear_str_index(
    txn: &WriteTransaction,
    def: redb::TableDefinition<&str, u64>,
) -> Result<u64, DatabaseError> {
    let table = txn.open_table(def)?;
    let keys: Vec<String> = table
        .iter()?
        .map(|r| r.map(|(k, _)| k.value().to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    drop(table);

    let mut table = txn.open_table(def)?;
    let mut removed = 0;
    for key in keys {
        table.remove(key.as_str())?;
        removed += 1;
    }
    Ok(removed)
}
