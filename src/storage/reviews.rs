use chrono::Utc;
use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::ReviewRecord;
use super::tables::*;

impl Database {
    // ========================================================================
    // Review operations
    // ========================================================================

    /// Create a review for `book_id`, owned by `user_id`, and maintain the
    /// per-book review index. The caller is responsible for checking that
    /// the book exists before attributing a review to it.
    pub fn create_review(
        &self,
        book_id: u64,
        user_id: u64,
        title: &str,
        text: &str,
        rate: u8,
    ) -> Result<ReviewRecord, DatabaseError> {
        debug_assert!((1..=5).contains(&rate), "rate must be within 1..=5");

        let write_txn = self.begin_write()?;
        let review = {
            let id = Self::next_id(&write_txn, "reviews")?;
            let review = ReviewRecord {
                id,
                book_id,
                title: title.to_string(),
                text: text.to_string(),
                rate,
                user_id,
                created_at: Utc::now(),
            };

            let mut table = write_txn.open_table(REVIEWS)?;
            let data = rmp_serde::to_vec_named(&review)?;
            table.insert(id, data.as_slice())?;

            // Maintain the per-book index; ids are appended in ascending order
            let mut index = write_txn.open_table(BOOK_REVIEWS)?;
            let mut review_ids: Vec<u64> = index
                .get(book_id)?
                .map(|v| rmp_serde::from_slice(v.value()).unwrap_or_default())
                .unwrap_or_default();
            review_ids.push(id);
            let index_data = rmp_serde::to_vec_named(&review_ids)?;
            index.insert(book_id, index_data.as_slice())?;

            review
        };
        write_txn.commit()?;
        Ok(review)
    }

    /// Get a review by id
    pub fn get_review(&self, id: u64) -> Result<Option<ReviewRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(REVIEWS)?;

        match table.get(id)? {
            Some(data) => {
                let review: ReviewRecord = rmp_serde::from_slice(data.value())?;
                Ok(Some(review))
            }
            None => Ok(None),
        }
    }

    /// All reviews for a book, newest first (descending id)
    pub fn reviews_for_book(&self, book_id: u64) -> Result<Vec<ReviewRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let index_table = read_txn.open_table(BOOK_REVIEWS)?;
        let reviews_table = read_txn.open_table(REVIEWS)?;

        let review_ids: Vec<u64> = match index_table.get(book_id)? {
            Some(data) => rmp_serde::from_slice(data.value())?,
            None => return Ok(Vec::new()),
        };

        let mut reviews = Vec::new();
        for review_id in review_ids.into_iter().rev() {
            if let Some(data) = reviews_table.get(review_id)? {
                let review: ReviewRecord = rmp_serde::from_slice(data.value())?;
                reviews.push(review);
            }
        }

        Ok(reviews)
    }
}
