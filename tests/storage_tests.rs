use bookshelf::storage::models::ShelfChanges;
use bookshelf::storage::{Database, DatabaseError};
use chrono::{Duration, Utc};

fn test_db() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("data")).unwrap();
    (dir, db)
}

fn sample_changes(title: &str) -> ShelfChanges {
    ShelfChanges {
        title: title.to_string(),
        text: "A book about things.".to_string(),
        category: "Fiction".to_string(),
        thumbnail: None,
    }
}

// ============================================================================
// Shelf tests
// ============================================================================

#[test]
fn test_create_and_get_shelf() {
    let (_dir, db) = test_db();

    let shelf = db.create_shelf(1, &sample_changes("Dune")).unwrap();
    assert_eq!(shelf.id, 1);
    assert_eq!(shelf.user_id, 1);

    let retrieved = db.get_shelf(shelf.id).unwrap().expect("shelf should exist");
    assert_eq!(retrieved.title, "Dune");
    assert_eq!(retrieved.text, "A book about things.");
    assert_eq!(retrieved.category, "Fiction");
    assert_eq!(retrieved.thumbnail, None);
    assert_eq!(retrieved.user_id, 1);
}

#[test]
fn test_get_shelf_not_found() {
    let (_dir, db) = test_db();
    assert!(db.get_shelf(42).unwrap().is_none());
}

#[test]
fn test_shelf_ids_are_sequential() {
    let (_dir, db) = test_db();

    let first = db.create_shelf(1, &sample_changes("First")).unwrap();
    let second = db.create_shelf(1, &sample_changes("Second")).unwrap();
    assert_eq!(second.id, first.id + 1);
}

#[test]
fn test_list_shelves_newest_first() {
    let (_dir, db) = test_db();

    db.create_shelf(1, &sample_changes("Oldest")).unwrap();
    db.create_shelf(1, &sample_changes("Middle")).unwrap();
    db.create_shelf(2, &sample_changes("Newest")).unwrap();

    let shelves = db.list_shelves().unwrap();
    let titles: Vec<&str> = shelves.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Newest", "Middle", "Oldest"]);
}

#[test]
fn test_update_shelf() {
    let (_dir, db) = test_db();

    let shelf = db.create_shelf(1, &sample_changes("Draft")).unwrap();
    let updated = db
        .update_shelf(
            shelf.id,
            &ShelfChanges {
                title: "Final".to_string(),
                text: "Rewritten.".to_string(),
                category: "Non-fiction".to_string(),
                thumbnail: Some("https://example.com/cover.png".to_string()),
            },
        )
        .unwrap();
    assert!(updated);

    let shelf = db.get_shelf(shelf.id).unwrap().unwrap();
    assert_eq!(shelf.title, "Final");
    assert_eq!(shelf.text, "Rewritten.");
    assert_eq!(shelf.category, "Non-fiction");
    assert_eq!(
        shelf.thumbnail,
        Some("https://example.com/cover.png".to_string())
    );
    assert!(shelf.updated_at >= shelf.created_at);
}

#[test]
fn test_update_shelf_not_found() {
    let (_dir, db) = test_db();
    assert!(!db.update_shelf(7, &sample_changes("Ghost")).unwrap());
}

#[test]
fn test_delete_shelf() {
    let (_dir, db) = test_db();

    let shelf = db.create_shelf(1, &sample_changes("Doomed")).unwrap();
    assert!(db.delete_shelf(shelf.id).unwrap());
    assert!(db.get_shelf(shelf.id).unwrap().is_none());
}

#[test]
fn test_delete_shelf_not_found() {
    let (_dir, db) = test_db();
    assert!(!db.delete_shelf(99).unwrap());
}

#[test]
fn test_delete_shelf_cascades_to_reviews() {
    let (_dir, db) = test_db();

    let shelf = db.create_shelf(1, &sample_changes("Reviewed")).unwrap();
    let review = db
        .create_review(shelf.id, 2, "Great", "Loved it.", 5)
        .unwrap();

    db.delete_shelf(shelf.id).unwrap();

    assert!(db.get_review(review.id).unwrap().is_none());
    assert!(db.reviews_for_book(shelf.id).unwrap().is_empty());
}

// ============================================================================
// Review tests
// ============================================================================

#[test]
fn test_create_and_get_review() {
    let (_dir, db) = test_db();

    let shelf = db.create_shelf(1, &sample_changes("Dune")).unwrap();
    let review = db
        .create_review(shelf.id, 2, "A classic", "Read it twice.", 4)
        .unwrap();

    let retrieved = db
        .get_review(review.id)
        .unwrap()
        .expect("review should exist");
    assert_eq!(retrieved.book_id, shelf.id);
    assert_eq!(retrieved.title, "A classic");
    assert_eq!(retrieved.rate, 4);
    assert_eq!(retrieved.user_id, 2);
}

#[test]
fn test_reviews_for_book_newest_first() {
    let (_dir, db) = test_db();

    let shelf = db.create_shelf(1, &sample_changes("Dune")).unwrap();
    db.create_review(shelf.id, 2, "First", "a", 3).unwrap();
    db.create_review(shelf.id, 3, "Second", "b", 4).unwrap();
    db.create_review(shelf.id, 2, "Third", "c", 5).unwrap();

    let reviews = db.reviews_for_book(shelf.id).unwrap();
    let titles: Vec<&str> = reviews.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
}

#[test]
fn test_reviews_for_book_no_reviews() {
    let (_dir, db) = test_db();

    let shelf = db.create_shelf(1, &sample_changes("Quiet")).unwrap();
    assert!(db.reviews_for_book(shelf.id).unwrap().is_empty());
}

#[test]
fn test_reviews_do_not_leak_across_books() {
    let (_dir, db) = test_db();

    let first = db.create_shelf(1, &sample_changes("First")).unwrap();
    let second = db.create_shelf(1, &sample_changes("Second")).unwrap();
    db.create_review(first.id, 2, "On first", "x", 5).unwrap();
    db.create_review(second.id, 2, "On second", "y", 2).unwrap();

    let reviews = db.reviews_for_book(first.id).unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].title, "On first");
}

// ============================================================================
// Ranking tests
// ============================================================================

#[test]
fn test_ranking_sorted_by_mean_rate() {
    let (_dir, db) = test_db();

    let low = db.create_shelf(1, &sample_changes("Low")).unwrap();
    let high = db.create_shelf(1, &sample_changes("High")).unwrap();
    let mid = db.create_shelf(1, &sample_changes("Mid")).unwrap();

    db.create_review(low.id, 2, "meh", "t", 1).unwrap();
    db.create_review(low.id, 3, "meh", "t", 2).unwrap();
    db.create_review(high.id, 2, "wow", "t", 5).unwrap();
    db.create_review(mid.id, 2, "ok", "t", 3).unwrap();

    let ranking = db.ranking(3).unwrap();
    let titles: Vec<&str> = ranking.iter().map(|r| r.shelf.title.as_str()).collect();
    assert_eq!(titles, vec!["High", "Mid", "Low"]);
    assert_eq!(ranking[0].avg_rating, Some(5.0));
    assert_eq!(ranking[2].avg_rating, Some(1.5));
}

#[test]
fn test_ranking_truncates_to_top_n() {
    let (_dir, db) = test_db();

    for i in 0..5 {
        let shelf = db
            .create_shelf(1, &sample_changes(&format!("Book {i}")))
            .unwrap();
        db.create_review(shelf.id, 2, "r", "t", (i + 1) as u8)
            .unwrap();
    }

    let ranking = db.ranking(3).unwrap();
    assert_eq!(ranking.len(), 3);
    assert_eq!(ranking[0].avg_rating, Some(5.0));
}

#[test]
fn test_ranking_unrated_shelves_sort_last() {
    let (_dir, db) = test_db();

    let unrated = db.create_shelf(1, &sample_changes("Unrated")).unwrap();
    let rated = db.create_shelf(1, &sample_changes("Rated")).unwrap();
    db.create_review(rated.id, 2, "r", "t", 1).unwrap();

    let ranking = db.ranking(3).unwrap();
    assert_eq!(ranking[0].shelf.id, rated.id);
    assert_eq!(ranking[1].shelf.id, unrated.id);
    assert_eq!(ranking[1].avg_rating, None);
}

#[test]
fn test_ranking_ties_keep_base_order() {
    let (_dir, db) = test_db();

    let first = db.create_shelf(1, &sample_changes("Tied first")).unwrap();
    let second = db.create_shelf(1, &sample_changes("Tied second")).unwrap();
    db.create_review(first.id, 2, "r", "t", 4).unwrap();
    db.create_review(second.id, 2, "r", "t", 4).unwrap();

    let ranking = db.ranking(3).unwrap();
    assert_eq!(ranking[0].shelf.id, first.id);
    assert_eq!(ranking[1].shelf.id, second.id);
}

// ============================================================================
// User tests
// ============================================================================

#[test]
fn test_create_and_get_user() {
    let (_dir, db) = test_db();

    let user = db.create_user("alice", b"hash", b"salt").unwrap();
    let retrieved = db.get_user(user.id).unwrap().expect("user should exist");
    assert_eq!(retrieved.username, "alice");
    assert_eq!(retrieved.password_hash, b"hash");
    assert_eq!(retrieved.password_salt, b"salt");
}

#[test]
fn test_get_user_by_username() {
    let (_dir, db) = test_db();

    let user = db.create_user("bob", b"h", b"s").unwrap();
    let retrieved = db
        .get_user_by_username("bob")
        .unwrap()
        .expect("user should exist");
    assert_eq!(retrieved.id, user.id);

    assert!(db.get_user_by_username("nobody").unwrap().is_none());
}

#[test]
fn test_duplicate_username_rejected() {
    let (_dir, db) = test_db();

    db.create_user("carol", b"h", b"s").unwrap();
    let err = db.create_user("carol", b"h2", b"s2").unwrap_err();
    assert!(matches!(err, DatabaseError::UsernameTaken(_)));

    assert!(db.username_exists("carol").unwrap());
    assert!(!db.username_exists("dave").unwrap());
}

// ============================================================================
// Session tests
// ============================================================================

#[test]
fn test_put_and_get_session() {
    let (_dir, db) = test_db();

    let expires = Utc::now() + Duration::hours(1);
    db.put_session("token-1", 7, expires).unwrap();

    let session = db
        .get_session("token-1")
        .unwrap()
        .expect("session should exist");
    assert_eq!(session.user_id, 7);
}

#[test]
fn test_expired_session_reported_absent() {
    let (_dir, db) = test_db();

    let expired = Utc::now() - Duration::hours(1);
    db.put_session("stale", 7, expired).unwrap();

    assert!(db.get_session("stale").unwrap().is_none());
    // And it was removed on the way out
    assert!(!db.delete_session("stale").unwrap());
}

#[test]
fn test_delete_session() {
    let (_dir, db) = test_db();

    db.put_session("gone", 7, Utc::now() + Duration::hours(1))
        .unwrap();
    assert!(db.delete_session("gone").unwrap());
    assert!(db.get_session("gone").unwrap().is_none());
}

// ============================================================================
// Purge tests
// ============================================================================

#[test]
fn test_purge_all() {
    let (_dir, db) = test_db();

    let shelf = db.create_shelf(1, &sample_changes("Purged")).unwrap();
    db.create_review(shelf.id, 2, "r", "t", 3).unwrap();
    db.create_user("erin", b"h", b"s").unwrap();
    db.put_session("tok", 1, Utc::now() + Duration::hours(1))
        .unwrap();

    let stats = db.purge_all().unwrap();
    assert_eq!(stats.shelves, 1);
    assert_eq!(stats.reviews, 1);
    assert_eq!(stats.users, 1);
    assert_eq!(stats.sessions, 1);

    assert!(db.list_shelves().unwrap().is_empty());
    assert!(db.get_user_by_username("erin").unwrap().is_none());

    // Counters reset with the rest, so ids restart
    let shelf = db.create_shelf(1, &sample_changes("Fresh")).unwrap();
    assert_eq!(shelf.id, 1);
}
