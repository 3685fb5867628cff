//! SQLite-backed session store.
//!
//! This crate persists opaque session payloads for a session-management
//! framework:
//! - Lookup, upsert, deletion and enumeration keyed by token
//! - Lazy expiry: expired rows are invisible to reads
//! - A cancellable background sweep that deletes expired rows
//!
//! The database connection is supplied by the caller and shared, never
//! closed by the store.
//!
//! # Example
//!
//! ```rust,ignore
//! use sqlitestore::{SessionStore, SqliteStore, StoreConfig, schema};
//!
//! let conn = schema::open("sessions.db")?;
//! let store = SqliteStore::with_config(
//!     conn,
//!     StoreConfig::new()
//!         .with_cleanup_interval(Duration::from_secs(60))
//!         .with_schema_setup(true),
//! )?;
//!
//! store.commit("token", b"payload", Utc::now() + TimeDelta::hours(1))?;
//! assert_eq!(store.find("token")?.as_deref(), Some(&b"payload"[..]));
//! ```

mod cleanup;
mod config;
mod error;
pub mod schema;
mod sqlite;
mod store;

pub use cleanup::{CleanupReporter, CleanupTask, TracingReporter};
pub use config::{DEFAULT_CLEANUP_INTERVAL, DEFAULT_TABLE_NAME, StoreConfig};
pub use error::{Error, Result};
pub use schema::SharedConnection;
pub use sqlite::SqliteStore;
pub use store::SessionStore;
