mod articles;
mod bookmarks;
mod queue;
mod schema;
mod stats;
mod types;

pub use schema::Database;
pub use types::{Article, CacheStats, PendingAction, Source, StorageError};
