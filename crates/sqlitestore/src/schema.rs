//! Sessions table schema and connection helpers.
//!
//! The store itself never opens or closes a database: it borrows a
//! [`SharedConnection`] owned by the application. The helpers here cover the
//! common setup for applications (and tests) that don't manage their own.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Connection handle shared between stores, their cleanup tasks and the
/// application.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Wrap an existing connection for sharing.
pub fn shared(conn: Connection) -> SharedConnection {
    Arc::new(Mutex::new(conn))
}

/// Open (or create) a database file with WAL journaling.
pub fn open(path: impl AsRef<Path>) -> Result<SharedConnection> {
    let path = path.as_ref();
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    info!("Session database opened at {:?}", path);
    Ok(shared(conn))
}

/// Open an in-memory database (for testing).
pub fn open_in_memory() -> Result<SharedConnection> {
    let conn = Connection::open_in_memory()?;
    Ok(shared(conn))
}

/// Create the sessions table and its expiry index if they don't exist.
pub fn create_schema(conn: &Connection, table: &str) -> Result<()> {
    validate_table_name(table)?;
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            token  TEXT      PRIMARY KEY,
            data   BLOB      NOT NULL,
            expiry TIMESTAMP NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_{table}_expiry ON {table}(expiry);"
    ))?;

    debug!(table = %table, "Session schema ready");
    Ok(())
}

/// Check that `name` can be spliced into SQL as a bare identifier.
///
/// Accepts ASCII letters, digits and underscores, not starting with a digit.
pub fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidTableName(name.to_string()))
    }
}
