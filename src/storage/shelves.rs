use chrono::Utc;
use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::{ReviewRecord, ShelfChanges, ShelfRecord};
use super::tables::*;

/// A shelf entry paired with the mean rate of its reviews, as produced by
/// [`Database::ranking`]. `avg_rating` is `None` for shelves with no reviews.
#[derive(Debug, Clone)]
pub struct RankedShelf {
    pub shelf: ShelfRecord,
    pub avg_rating: Option<f64>,
}

impl Database {
    // ========================================================================
    // Shelf operations
    // ========================================================================

    /// Create a shelf entry owned by `user_id` and return it.
    pub fn create_shelf(
        &self,
        user_id: u64,
        changes: &ShelfChanges,
    ) -> Result<ShelfRecord, DatabaseError> {
        debug_assert!(!changes.title.is_empty(), "shelf title must not be empty");

        let now = Utc::now();
        let write_txn = self.begin_write()?;
        let shelf = {
            let id = Self::next_id(&write_txn, "shelves")?;
            let shelf = ShelfRecord {
                id,
                title: changes.title.clone(),
                text: changes.text.clone(),
                category: changes.category.clone(),
                thumbnail: changes.thumbnail.clone(),
                user_id,
                created_at: now,
                updated_at: now,
            };

            let mut table = write_txn.open_table(SHELVES)?;
            let data = rmp_serde::to_vec_named(&shelf)?;
            table.insert(id, data.as_slice())?;
            shelf
        };
        write_txn.commit()?;
        Ok(shelf)
    }

    /// Get a shelf entry by id
    pub fn get_shelf(&self, id: u64) -> Result<Option<ShelfRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(SHELVES)?;

        match table.get(id)? {
            Some(data) => {
                let shelf: ShelfRecord = rmp_serde::from_slice(data.value())?;
                Ok(Some(shelf))
            }
            None => Ok(None),
        }
    }

    /// List all shelf entries, newest first (descending id)
    pub fn list_shelves(&self) -> Result<Vec<ShelfRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(SHELVES)?;

        let mut shelves = Vec::new();
        for result in table.iter()?.rev() {
            let (_, value) = result?;
            let shelf: ShelfRecord = rmp_serde::from_slice(value.value())?;
            shelves.push(shelf);
        }

        Ok(shelves)
    }

    /// Apply edit-form changes to a shelf entry. Returns false when the
    /// entry does not exist. Ownership is checked by the caller before any
    /// mutation reaches this point.
    pub fn update_shelf(&self, id: u64, changes: &ShelfChanges) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;

        let existing = {
            let table = write_txn.open_table(SHELVES)?;
            let out = match table.get(id)? {
                Some(data) => {
                    let shelf: ShelfRecord = rmp_serde::from_slice(data.value())?;
                    Some(shelf)
                }
                None => None,
            };
            out
        };

        let updated = match existing {
            Some(mut shelf) => {
                shelf.title = changes.title.clone();
                shelf.text = changes.text.clone();
                shelf.category = changes.category.clone();
                shelf.thumbnail = changes.thumbnail.clone();
                shelf.updated_at = Utc::now();

                let serialized = rmp_serde::to_vec_named(&shelf)?;
                let mut table = write_txn.open_table(SHELVES)?;
                table.insert(id, serialized.as_slice())?;
                true
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(updated)
    }

    /// Delete a shelf entry together with its reviews and review index.
    /// Deletion is immediate and permanent.
    pub fn delete_shelf(&self, id: u64) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;

        let exists = {
            let table = write_txn.open_table(SHELVES)?;
            let out = table.get(id)?.is_some();
            out
        };

        let deleted = if exists {
            {
                let mut table = write_txn.open_table(SHELVES)?;
                table.remove(id)?;
            }

            // Cascade: drop the book's reviews and its index entry
            let review_ids: Vec<u64> = {
                let index = write_txn.open_table(BOOK_REVIEWS)?;
                let out = match index.get(id)? {
                    Some(data) => rmp_serde::from_slice(data.value())?,
                    None => Vec::new(),
                };
                out
            };
            {
                let mut reviews = write_txn.open_table(REVIEWS)?;
                for review_id in review_ids {
                    reviews.remove(review_id)?;
                }
            }
            {
                let mut index = write_txn.open_table(BOOK_REVIEWS)?;
                index.remove(id)?;
            }
            true
        } else {
            false
        };

        write_txn.commit()?;
        Ok(deleted)
    }

    /// Top `top_n` shelves by mean review rate, descending. Shelves without
    /// reviews sort after all rated ones; ties keep the stable id-ascending
    /// base order.
    pub fn ranking(&self, top_n: usize) -> Result<Vec<RankedShelf>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let shelves_table = read_txn.open_table(SHELVES)?;
        let index_table = read_txn.open_table(BOOK_REVIEWS)?;
        let reviews_table = read_txn.open_table(REVIEWS)?;

        let mut ranked = Vec::new();
        for result in shelves_table.iter()? {
            let (_, value) = result?;
            let shelf: ShelfRecord = rmp_serde::from_slice(value.value())?;

            let review_ids: Vec<u64> = match index_table.get(shelf.id)? {
                Some(data) => rmp_serde::from_slice(data.value())?,
                None => Vec::new(),
            };

            let mut sum = 0u64;
            let mut count = 0u64;
            for review_id in review_ids {
                if let Some(data) = reviews_table.get(review_id)? {
                    let review: ReviewRecord = rmp_serde::from_slice(data.value())?;
                    sum += u64::from(review.rate);
                    count += 1;
                }
            }

            let avg_rating = if count > 0 {
                Some(sum as f64 / count as f64)
            } else {
                None
            };
            ranked.push(RankedShelf { shelf, avg_rating });
        }

        ranked.sort_by(|a, b| match (a.avg_rating, b.avg_rating) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        ranked.truncate(top_n);

        Ok(ranked)
    }
}
