//! SQLite backend for the Inkbook studio store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Appointment writes run the conflict
//! check and the write inside one `BEGIN IMMEDIATE` transaction.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{DEFAULT_TIMEOUT, SqliteStore};
