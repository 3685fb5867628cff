//! Session store backed by a SQLite table.
//!
//! Every operation is a single parameterized statement against the shared
//! connection. Expiry is enforced lazily in the `WHERE` clause of each read,
//! and eagerly by the background sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};
use tracing::{debug, trace};

use crate::cleanup::{CleanupReporter, CleanupTask, TracingReporter};
use crate::config::StoreConfig;
use crate::error::Result;
use crate::schema::{SharedConnection, create_schema, validate_table_name};
use crate::store::SessionStore;

/// SQL statements for one sessions table.
#[derive(Debug)]
struct Queries {
    find: String,
    upsert: String,
    delete: String,
    all: String,
    delete_expired: String,
}

impl Queries {
    /// Build the statements for `table`. The name must already be validated.
    fn new(table: &str) -> Self {
        Self {
            find: format!("SELECT data FROM {table} WHERE token = ?1 AND expiry > ?2"),
            upsert: format!(
                "INSERT INTO {table} (token, data, expiry) VALUES (?1, ?2, ?3)
                 ON CONFLICT(token) DO UPDATE SET data = excluded.data, expiry = excluded.expiry"
            ),
            delete: format!("DELETE FROM {table} WHERE token = ?1"),
            all: format!("SELECT token, data FROM {table} WHERE expiry > ?1"),
            delete_expired: format!("DELETE FROM {table} WHERE expiry <= ?1"),
        }
    }
}

/// Encode an instant as microseconds since the Unix epoch.
///
/// Every `DateTime<Utc>` fits in an `i64` of microseconds, so SQLite's
/// integer comparison is chronological over the whole range.
fn encode_instant(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_micros()
}

fn delete_expired(conn: &SharedConnection, queries: &Queries) -> Result<usize> {
    let now = encode_instant(Utc::now());
    let removed = conn.lock().execute(&queries.delete_expired, params![now])?;
    Ok(removed)
}

/// Session store over a shared SQLite connection.
///
/// The connection is borrowed, not owned: the store never closes it, and
/// any number of stores may share one. When a cleanup interval is
/// configured, the store owns a background task that periodically deletes
/// expired rows; the task stops on [`stop_cleanup`](Self::stop_cleanup) or
/// when the store is dropped.
pub struct SqliteStore {
    conn: SharedConnection,
    queries: Arc<Queries>,
    cleanup: Option<CleanupTask>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("queries", &self.queries)
            .field("cleanup", &self.cleanup)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Create a store that sweeps expired sessions every five minutes.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(conn: SharedConnection) -> Result<Self> {
        Self::with_config(conn, StoreConfig::default())
    }

    /// Create a store with an explicit cleanup interval.
    ///
    /// `Duration::ZERO` disables the background sweep; expired sessions are
    /// then hidden from lookups but never physically removed by the store.
    pub fn with_cleanup_interval(conn: SharedConnection, interval: Duration) -> Result<Self> {
        Self::with_config(conn, StoreConfig::new().with_cleanup_interval(interval))
    }

    /// Create a store from a full configuration, logging sweeps via `tracing`.
    pub fn with_config(conn: SharedConnection, config: StoreConfig) -> Result<Self> {
        Self::with_reporter(conn, config, Arc::new(TracingReporter))
    }

    /// Create a store whose sweep results go to `reporter`.
    pub fn with_reporter(
        conn: SharedConnection,
        config: StoreConfig,
        reporter: Arc<dyn CleanupReporter>,
    ) -> Result<Self> {
        validate_table_name(&config.table_name)?;

        if config.create_schema {
            create_schema(&conn.lock(), &config.table_name)?;
        }

        let queries = Arc::new(Queries::new(&config.table_name));

        let cleanup = if config.cleanup_enabled() {
            let conn = Arc::clone(&conn);
            let queries = Arc::clone(&queries);
            Some(CleanupTask::spawn(
                config.cleanup_interval,
                move || delete_expired(&conn, &queries),
                reporter,
            )?)
        } else {
            None
        };

        debug!(
            table = %config.table_name,
            cleanup = cleanup.is_some(),
            "Session store created"
        );

        Ok(Self {
            conn,
            queries,
            cleanup,
        })
    }

    /// The shared connection this store operates on.
    pub fn connection(&self) -> &SharedConnection {
        &self.conn
    }

    /// Delete every expired session now. Returns the number of rows removed.
    ///
    /// This is the statement the background task runs on each tick.
    pub fn delete_expired(&self) -> Result<usize> {
        let removed = delete_expired(&self.conn, &self.queries)?;
        debug!(removed = removed, "Deleted expired sessions");
        Ok(removed)
    }

    /// Stop the background cleanup task.
    ///
    /// Safe to call repeatedly, and a no-op when cleanup was never started.
    pub fn stop_cleanup(&self) {
        if let Some(task) = &self.cleanup {
            task.stop();
        }
    }

    /// Stop the background cleanup task and wait for it to exit.
    pub async fn shutdown_cleanup(&mut self) {
        if let Some(task) = self.cleanup.take() {
            task.shutdown().await;
        }
    }

    /// Whether a background cleanup task is currently running.
    pub fn is_cleanup_running(&self) -> bool {
        self.cleanup.as_ref().is_some_and(CleanupTask::is_running)
    }
}

impl SessionStore for SqliteStore {
    fn find(&self, token: &str) -> Result<Option<Vec<u8>>> {
        let now = encode_instant(Utc::now());
        let data: Option<Vec<u8>> = self
            .conn
            .lock()
            .query_row(&self.queries.find, params![token, now], |row| row.get(0))
            .optional()?;

        trace!(token = %token, found = data.is_some(), "Session lookup");
        Ok(data)
    }

    fn commit(&self, token: &str, data: &[u8], expiry: DateTime<Utc>) -> Result<()> {
        self.conn.lock().execute(
            &self.queries.upsert,
            params![token, data, encode_instant(expiry)],
        )?;

        trace!(token = %token, expiry = %expiry, bytes = data.len(), "Session committed");
        Ok(())
    }

    fn delete(&self, token: &str) -> Result<()> {
        self.conn.lock().execute(&self.queries.delete, params![token])?;

        trace!(token = %token, "Session deleted");
        Ok(())
    }

    fn all(&self) -> Result<HashMap<String, Vec<u8>>> {
        let now = encode_instant(Utc::now());
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&self.queries.all)?;
        let mut rows = stmt.query(params![now])?;

        let mut sessions: HashMap<String, Vec<u8>> = HashMap::new();
        while let Some(row) = rows.next()? {
            sessions.insert(row.get(0)?, row.get(1)?);
        }

        debug!(count = sessions.len(), "Listed active sessions");
        Ok(sessions)
    }
}
