//! Binjola Storage Layer
//!
//! SQLite-backed durable key-value settings. Every write is committed before
//! the call returns.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
