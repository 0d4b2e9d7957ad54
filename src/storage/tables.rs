use redb::TableDefinition;

/// Shelf records: id -> ShelfRecord (msgpack)
pub const SHELVES: TableDefinition<u64, &[u8]> = TableDefinition::new("shelves");

/// Review records: id -> ReviewRecord (msgpack)
pub const REVIEWS: TableDefinition<u64, &[u8]> = TableDefinition::new("reviews");

/// Per-book review index: shelf id -> msgpack Vec of review ids (ascending)
pub const BOOK_REVIEWS: TableDefinition<u64, &[u8]> = TableDefinition::new("book_reviews");

/// User records: id -> UserRecord (msgpack)
pub const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Username index: username -> user id (enforces uniqueness)
pub const USERNAMES: TableDefinition<&str, u64> = TableDefinition::new("usernames");

/// Login sessions: token -> SessionRecord (msgpack)
pub const SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// Id sequences: entity name -> last issued id
pub const COUNTERS: TableDefinition<&str, u64> = TableDefinition::new("counters");
