//! SQLite history store for AgentForge.
//!
//! Persists chat turns and daily summaries in a single SQLite file.

mod backend;
mod schema;

pub use backend::SqliteHistoryStore;
