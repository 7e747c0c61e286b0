//! Content store: discussions and their link sub-collections on SQLite.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::ContentStore;
pub use types::{Discussion, Link, LinkKind, NewDiscussion, NewLink, StoreStats};
