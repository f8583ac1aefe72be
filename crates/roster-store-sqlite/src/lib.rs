//! SQLite backend for the Roster person store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. That single thread is also what makes
//! optimistic writes and their compensating rollbacks naturally ordered.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqlitePersonStore;

#[cfg(test)]
mod tests;
